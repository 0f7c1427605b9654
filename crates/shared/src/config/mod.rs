mod database;
mod jwt;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::jwt::{Claims, CustomerClaims, JwtConfig};

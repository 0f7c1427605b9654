use crate::errors::repository::RepositoryError;
use jsonwebtoken::errors::Error as JwtError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(String),

    #[error("All requested products are out of stock")]
    OutOfStock,

    #[error("Order persistence failed: {0}")]
    OrderPersistence(#[source] RepositoryError),

    #[error("Timed out while {0}")]
    LockTimeout(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid Token")]
    InvalidTokenType,
}

impl ServiceError {
    /// Whether the caller may resubmit the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::LockTimeout(_) | ServiceError::OrderPersistence(_)
        )
    }
}

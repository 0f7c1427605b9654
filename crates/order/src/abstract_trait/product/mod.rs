mod repository;

pub use self::repository::{DynProductQueryRepository, ProductQueryRepositoryTrait};

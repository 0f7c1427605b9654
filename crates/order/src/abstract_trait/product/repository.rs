use crate::model::product::Product as ProductModel;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;

/// Inventory reader: current price and stock of a sellable product.
#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProductModel>, RepositoryError>;
}

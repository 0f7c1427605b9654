use crate::{
    abstract_trait::product::ProductQueryRepositoryTrait, model::product::Product as ProductModel,
    model::status::RecordStatus,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProductModel>, RepositoryError> {
        info!("🔍 Looking up product {id}");

        let product = sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT id, name, price, stock, status
            FROM products
            WHERE id = $1 AND status <> $2
            "#,
        )
        .bind(id)
        .bind(RecordStatus::Deleted.as_str())
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch product {id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(product)
    }
}

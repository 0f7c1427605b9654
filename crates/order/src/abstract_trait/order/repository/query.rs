use crate::{
    domain::requests::order::FindMyOrders,
    model::{order::Order as OrderModel, order_item::OrderItem as OrderItemModel},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    /// Non-deleted orders of one customer, plus the total count before paging.
    async fn find_by_customer(
        &self,
        customer_id: &str,
        req: &FindMyOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError>;
    async fn find_by_invoice(&self, invoice: &str) -> Result<Option<OrderModel>, RepositoryError>;
    async fn find_items_by_invoice(
        &self,
        invoice: &str,
    ) -> Result<Vec<OrderItemModel>, RepositoryError>;
}

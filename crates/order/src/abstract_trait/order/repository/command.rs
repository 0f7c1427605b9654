use crate::{
    domain::requests::order::{
        CreateOrderItemRecordRequest, CreateOrderRecordRequest, TrashOrderRecordRequest,
    },
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Writes the header, every line and the matching stock decrements in one
    /// transaction. Either all of it is committed or none of it is.
    ///
    /// A line whose product has less stock than its quantity fails the whole
    /// call with [`RepositoryError::InsufficientStock`].
    async fn create_order(
        &self,
        order: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(), RepositoryError>;

    /// Soft-deletes an order owned by the customer, together with its lines.
    async fn trash_order(&self, req: &TrashOrderRecordRequest)
    -> Result<OrderModel, RepositoryError>;
}

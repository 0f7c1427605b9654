use crate::domain::{
    requests::order::CreateOrderRequest, response::order::CreatedOrderResponse,
    response::order::OrderResponse,
};
use async_trait::async_trait;
use shared::{config::CustomerClaims, domain::responses::ApiResponse, errors::ServiceError};
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        customer: &CustomerClaims,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreatedOrderResponse>, ServiceError>;
    async fn trash_order(
        &self,
        customer: &CustomerClaims,
        invoice: &str,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}

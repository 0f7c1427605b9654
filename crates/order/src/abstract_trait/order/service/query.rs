use crate::domain::{
    requests::order::FindMyOrders,
    response::{order::OrderResponse, order_item::OrderItemResponse},
};
use async_trait::async_trait;
use shared::{
    domain::responses::{ApiResponse, ApiResponsePagination},
    errors::ServiceError,
};
use std::sync::Arc;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_my_orders(
        &self,
        customer_id: &str,
        req: &FindMyOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError>;
    async fn find_my_order_items(
        &self,
        customer_id: &str,
        invoice: &str,
    ) -> Result<ApiResponse<Vec<OrderItemResponse>>, ServiceError>;
}

use crate::model::order_item::OrderItem as OrderItemModel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderItemResponse {
    pub invoice: String,
    pub product_id: String,
    pub qty: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
    pub status: String,
    pub created_at: String,
    pub created_by: String,
}

impl From<OrderItemModel> for OrderItemResponse {
    fn from(value: OrderItemModel) -> Self {
        OrderItemResponse {
            invoice: value.invoice,
            product_id: value.product_id,
            qty: value.qty,
            price: value.price,
            amount: value.amount,
            status: value.status,
            created_at: value.created_at.to_string(),
            created_by: value.created_by,
        }
    }
}

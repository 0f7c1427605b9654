use crate::model::order::Order as OrderModel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub invoice: String,
    pub customer_id: String,
    pub amount: Decimal,
    pub payment: bool,
    pub status: String,
    pub created_at: String,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

// model to response
impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            invoice: value.invoice,
            customer_id: value.customer_id,
            amount: value.amount,
            payment: value.payment,
            status: value.status,
            created_at: value.created_at.to_string(),
            created_by: value.created_by,
            updated_at: value.updated_at.map(|dt| dt.to_string()),
            updated_by: value.updated_by,
        }
    }
}

/// Acknowledgement returned when an order has been placed.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreatedOrderResponse {
    pub invoice: String,
    pub amount: Decimal,
    /// Requested products left out of the order because they had no stock.
    pub excluded_products: Vec<String>,
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Read-only view of a catalogue product: only what pricing needs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: Decimal,
    pub status: String,
}

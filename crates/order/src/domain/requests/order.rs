use crate::model::status::RecordStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone)]
pub struct CreateOrderRequest {
    pub payment: bool,

    #[validate(length(min = 1, message = "at least one product is required"), nested)]
    pub products: Vec<OrderProductRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema, Clone)]
pub struct OrderProductRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(rename = "product_id")]
    pub product_id: String,

    #[validate(custom(function = "validate_positive_qty"))]
    #[schema(value_type = f64, example = 2)]
    pub qty: Decimal,
}

/// Decimal places a quantity may carry, matching `NUMERIC(18,4)`.
pub const QTY_SCALE: u32 = 4;

/// Exclusive upper bound for a quantity: 14 integer digits.
pub const QTY_LIMIT: Decimal = Decimal::from_parts(0x107A_4000, 0x5AF3, 0, false, 0);

fn validate_positive_qty(qty: &Decimal) -> Result<(), ValidationError> {
    if !qty.is_sign_positive() || qty.is_zero() {
        return Err(
            ValidationError::new("range").with_message("qty must be greater than zero".into())
        );
    }
    if qty.normalize().scale() > QTY_SCALE {
        return Err(ValidationError::new("scale")
            .with_message(format!("qty allows at most {QTY_SCALE} decimal places").into()));
    }
    if *qty >= QTY_LIMIT {
        return Err(ValidationError::new("range")
            .with_message(format!("qty must be less than {QTY_LIMIT}").into()));
    }
    Ok(())
}

/// Order header as handed to the persistence layer.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub invoice: String,
    pub customer_id: String,
    pub amount: Decimal,
    pub payment: bool,
    pub status: RecordStatus,
    pub created_by: String,
}

/// One priced line, stamped with its order's invoice.
#[derive(Debug, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub invoice: String,
    pub product_id: String,
    pub qty: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
    pub status: RecordStatus,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct TrashOrderRecordRequest {
    pub invoice: String,
    pub customer_id: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortField {
    #[default]
    CreatedAt,
    Invoice,
    Amount,
}

impl OrderSortField {
    pub fn column(&self) -> &'static str {
        match self {
            OrderSortField::CreatedAt => "created_at",
            OrderSortField::Invoice => "invoice",
            OrderSortField::Amount => "amount",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Highest page a listing may request.
pub const MAX_PAGE: i64 = 1_000_000;

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Listing filter for the authenticated customer's orders.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams, PartialEq, Eq)]
#[into_params(parameter_in = Query)]
pub struct FindMyOrders {
    /// Case-insensitive substring of the invoice.
    #[validate(length(max = 100))]
    pub invoice: Option<String>,

    #[serde(default)]
    pub sort_field: OrderSortField,

    #[serde(default)]
    pub sort_direction: SortDirection,

    #[validate(range(min = 1, max = MAX_PAGE))]
    #[serde(default = "default_page")]
    pub page: i64,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for FindMyOrders {
    fn default() -> Self {
        Self {
            invoice: None,
            sort_field: OrderSortField::default(),
            sort_direction: SortDirection::default(),
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl FindMyOrders {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceQuery {
    #[validate(length(min = 1, max = 100))]
    pub invoice: String,
}

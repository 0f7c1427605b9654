use crate::{
    abstract_trait::product::DynProductQueryRepository,
    domain::{
        pricing::{PricedLine, PricedOrder},
        requests::order::OrderProductRequest,
    },
};
use shared::errors::ServiceError;
use tracing::{error, info, warn};

/// Resolves requested lines against live inventory.
#[derive(Clone)]
pub struct OrderPricer {
    products: DynProductQueryRepository,
}

impl OrderPricer {
    pub fn new(products: DynProductQueryRepository) -> Self {
        Self { products }
    }

    /// Prices every line in request order. A missing product aborts the
    /// whole order; a product with zero stock is left out and reported in
    /// [`PricedOrder::excluded`].
    pub async fn price(&self, lines: &[OrderProductRequest]) -> Result<PricedOrder, ServiceError> {
        let mut priced = PricedOrder::default();

        for line in lines {
            let product = self
                .products
                .find_by_id(&line.product_id)
                .await
                .map_err(|e| {
                    error!("❌ Failed to load product {}: {e:?}", line.product_id);
                    ServiceError::Repo(e.in_step("load product"))
                })?
                .ok_or_else(|| {
                    warn!("⚠️ Product {} does not exist", line.product_id);
                    ServiceError::ProductNotFound(line.product_id.clone())
                })?;

            if product.stock.is_zero() {
                info!("📭 Product {} is out of stock, skipping line", product.id);
                priced.exclude(line.product_id.clone());
                continue;
            }

            PricedLine::new(line.product_id.clone(), line.qty, product.price)
                .and_then(|priced_line| priced.push(priced_line))
                .map_err(|overflow| {
                    warn!("⚠️ Amount out of range for product {}", overflow.product_id);
                    ServiceError::Validation(vec![overflow.message()])
                })?;
        }

        Ok(priced)
    }
}

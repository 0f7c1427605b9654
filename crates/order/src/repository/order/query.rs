use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::FindMyOrders,
    model::{
        order::Order as OrderModel, order_item::OrderItem as OrderItemModel, status::RecordStatus,
    },
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

/// `%needle%` for ILIKE, with the needle's own wildcards matched literally.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_customer_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    customer_id: &str,
    req: &FindMyOrders,
) {
    builder
        .push(" WHERE customer_id = ")
        .push_bind(customer_id.to_string())
        .push(" AND status <> ")
        .push_bind(RecordStatus::Deleted.as_str());

    if let Some(invoice) = req.invoice.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        builder
            .push(" AND invoice ILIKE ")
            .push_bind(contains_pattern(invoice))
            .push(r" ESCAPE '\'");
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_by_customer(
        &self,
        customer_id: &str,
        req: &FindMyOrders,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching orders for customer {customer_id} | page={} limit={}",
            req.page, req.limit
        );

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders");
        push_customer_filter(&mut count, customer_id, req);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to count orders for customer {customer_id}: {e:?}");
                RepositoryError::from(e)
            })?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM orders");
        push_customer_filter(&mut select, customer_id, req);

        // Sort keys come from closed enums, never from raw input.
        let direction = req.sort_direction.as_sql();
        select
            .push(format!(
                " ORDER BY {} {direction}, invoice {direction}",
                req.sort_field.column()
            ))
            .push(" LIMIT ")
            .push_bind(req.limit)
            .push(" OFFSET ")
            .push_bind(req.offset());

        let orders = select
            .build_query_as::<OrderModel>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch orders for customer {customer_id}: {e:?}");
                RepositoryError::from(e)
            })?;

        info!("✅ Found {} orders (total {total})", orders.len());
        Ok((orders, total))
    }

    async fn find_by_invoice(&self, invoice: &str) -> Result<Option<OrderModel>, RepositoryError> {
        sqlx::query_as::<_, OrderModel>("SELECT * FROM orders WHERE invoice = $1")
            .bind(invoice)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch order {invoice}: {e:?}");
                RepositoryError::from(e)
            })
    }

    async fn find_items_by_invoice(
        &self,
        invoice: &str,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        info!("📦 Fetching order items for invoice {invoice}");

        sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT invoice, product_id, qty, price, amount, status,
                   created_at, created_by, updated_at, updated_by
            FROM order_detail
            WHERE invoice = $1
            ORDER BY id
            "#,
        )
        .bind(invoice)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch items for order {invoice}: {e:?}");
            RepositoryError::from(e)
        })
    }
}

use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::{
        CreateOrderItemRecordRequest, CreateOrderRecordRequest, TrashOrderRecordRequest,
    },
    model::{order::Order as OrderModel, status::RecordStatus},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{Postgres, QueryBuilder};
use tracing::{error, info, warn};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

fn step_error(step: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |err| {
        error!("❌ Order transaction failed at '{step}': {err:?}");
        RepositoryError::from(err).in_step(step)
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        order: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(), RepositoryError> {
        if items.is_empty() {
            return Err(RepositoryError::Custom(format!(
                "order {} has no line items",
                order.invoice
            )));
        }

        // Dropping `tx` before commit rolls back everything below.
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(step_error("begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO orders (invoice, customer_id, amount, payment, status, created_at, created_by)
            VALUES ($1, $2, $3, $4, $5, current_timestamp, $6)
            "#,
        )
        .bind(&order.invoice)
        .bind(&order.customer_id)
        .bind(order.amount)
        .bind(order.payment)
        .bind(order.status.as_str())
        .bind(&order.created_by)
        .execute(&mut *tx)
        .await
        .map_err(step_error("insert order header"))?;

        let mut insert_items = QueryBuilder::<Postgres>::new(
            "INSERT INTO order_detail (invoice, product_id, qty, price, amount, status, created_at, created_by) ",
        );
        insert_items.push_values(items, |mut row, item| {
            row.push_bind(item.invoice.clone())
                .push_bind(item.product_id.clone())
                .push_bind(item.qty)
                .push_bind(item.price)
                .push_bind(item.amount)
                .push_bind(item.status.as_str())
                .push("current_timestamp")
                .push_bind(item.created_by.clone());
        });

        insert_items
            .build()
            .execute(&mut *tx)
            .await
            .map_err(step_error("insert order items"))?;

        for item in items {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $1
                WHERE id = $2 AND stock >= $1
                "#,
            )
            .bind(item.qty)
            .bind(&item.product_id)
            .execute(&mut *tx)
            .await
            .map_err(step_error("decrement stock"))?;

            if result.rows_affected() == 0 {
                warn!(
                    "⚠️ Not enough stock for product {} (requested {}), rolling back order {}",
                    item.product_id, item.qty, order.invoice
                );
                return Err(RepositoryError::InsufficientStock(item.product_id.clone())
                    .in_step("decrement stock"));
            }
        }

        tx.commit().await.map_err(step_error("commit"))?;

        info!(
            "✅ Created order {} for customer {} with {} item(s)",
            order.invoice,
            order.customer_id,
            items.len()
        );
        Ok(())
    }

    async fn trash_order(
        &self,
        req: &TrashOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        info!("🗑️ Trashing order {}", req.invoice);

        let mut tx = self
            .db
            .begin()
            .await
            .map_err(step_error("begin transaction"))?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET status = $3,
                updated_at = current_timestamp,
                updated_by = $4
            WHERE invoice = $1 AND customer_id = $2 AND status <> $3
            RETURNING *
            "#,
        )
        .bind(&req.invoice)
        .bind(&req.customer_id)
        .bind(RecordStatus::Deleted.as_str())
        .bind(&req.updated_by)
        .fetch_optional(&mut *tx)
        .await
        .map_err(step_error("trash order header"))?
        .ok_or(RepositoryError::NotFound)?;

        sqlx::query(
            r#"
            UPDATE order_detail
            SET status = $2,
                updated_at = current_timestamp,
                updated_by = $3
            WHERE invoice = $1
            "#,
        )
        .bind(&req.invoice)
        .bind(RecordStatus::Deleted.as_str())
        .bind(&req.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(step_error("trash order items"))?;

        tx.commit().await.map_err(step_error("commit"))?;

        Ok(order)
    }
}

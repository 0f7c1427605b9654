use crate::{
    abstract_trait::order::repository::DynOrderCommandRepository,
    domain::requests::order::{CreateOrderItemRecordRequest, CreateOrderRecordRequest},
};
use shared::errors::{RepositoryError, ServiceError};
use std::{sync::Arc, time::Duration};
use tokio::{sync::Mutex, time::timeout};
use tracing::{error, info, warn};

/// Serializes order creation and bounds it by deadlines.
///
/// The header, the line items and the stock decrements are written by the
/// command repository in one transaction. If the transaction future is
/// dropped on timeout, the uncommitted transaction is rolled back.
#[derive(Clone)]
pub struct OrderTransactionExecutor {
    command: DynOrderCommandRepository,
    lock: Arc<Mutex<()>>,
    lock_timeout: Duration,
    transaction_timeout: Duration,
}

impl OrderTransactionExecutor {
    pub fn new(
        command: DynOrderCommandRepository,
        lock_timeout: Duration,
        transaction_timeout: Duration,
    ) -> Self {
        Self {
            command,
            lock: Arc::new(Mutex::new(())),
            lock_timeout,
            transaction_timeout,
        }
    }

    pub async fn execute(
        &self,
        order: &CreateOrderRecordRequest,
        items: &[CreateOrderItemRecordRequest],
    ) -> Result<(), ServiceError> {
        let _guard = timeout(self.lock_timeout, self.lock.lock())
            .await
            .map_err(|_| {
                warn!(
                    "⏳ Could not acquire order lock within {:?} for {}",
                    self.lock_timeout, order.invoice
                );
                ServiceError::LockTimeout("acquiring the order lock".into())
            })?;

        info!("🔒 Order lock acquired for {}", order.invoice);

        timeout(self.transaction_timeout, self.command.create_order(order, items))
            .await
            .map_err(|_| {
                error!(
                    "⏳ Order transaction for {} exceeded {:?}, rolled back",
                    order.invoice, self.transaction_timeout
                );
                ServiceError::LockTimeout("running the order transaction".into())
            })?
            .map_err(classify)
    }
}

fn classify(err: RepositoryError) -> ServiceError {
    match err.root() {
        RepositoryError::InsufficientStock(product_id) => {
            ServiceError::InsufficientStock(product_id.clone())
        }
        _ => ServiceError::OrderPersistence(err),
    }
}

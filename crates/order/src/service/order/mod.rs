mod command;
mod executor;
mod pricer;
mod query;

pub use self::command::{MAX_INVOICE_ATTEMPTS, OrderCommandService, OrderCommandServiceDeps};
pub use self::executor::OrderTransactionExecutor;
pub use self::pricer::OrderPricer;
pub use self::query::OrderQueryService;

use crate::{
    abstract_trait::{
        invoice::DynInvoiceGenerator,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        product::DynProductQueryRepository,
    },
    repository::{
        order::{OrderCommandRepository, OrderQueryRepository},
        product::ProductQueryRepository,
    },
    service::{
        invoice::TimestampInvoiceGenerator,
        order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService},
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc, time::Duration};

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_command: DynOrderCommandService,
    pub order_query: DynOrderQueryService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_command", &"OrderCommandService")
            .field("order_query", &"OrderQueryService")
            .finish()
    }
}

/// Storage and clock seams the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub products: DynProductQueryRepository,
    pub order_command: DynOrderCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub invoices: DynInvoiceGenerator,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            products: Arc::new(ProductQueryRepository::new(pool.clone())),
            order_command: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool)),
            invoices: Arc::new(TimestampInvoiceGenerator::new()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrderTimeouts {
    pub lock: Duration,
    pub transaction: Duration,
}

impl DependenciesInject {
    pub fn from_repositories(
        repos: Repositories,
        timeouts: OrderTimeouts,
        registry: &mut Registry,
    ) -> Self {
        let Repositories {
            products,
            order_command,
            order_query,
            invoices,
        } = repos;

        let order_command = OrderCommandService::new(
            OrderCommandServiceDeps {
                products,
                command: order_command,
                invoices,
                lock_timeout: timeouts.lock,
                transaction_timeout: timeouts.transaction,
            },
            registry,
        );

        let order_query = OrderQueryService::new(order_query, registry);

        Self {
            order_command: Arc::new(order_command),
            order_query: Arc::new(order_query),
        }
    }
}

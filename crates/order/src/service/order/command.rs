use crate::{
    abstract_trait::{
        invoice::DynInvoiceGenerator,
        order::{repository::DynOrderCommandRepository, service::OrderCommandServiceTrait},
        product::DynProductQueryRepository,
    },
    domain::{
        pricing::PricedOrder,
        requests::{
            order::{
                CreateOrderItemRecordRequest, CreateOrderRecordRequest, CreateOrderRequest,
                TrashOrderRecordRequest,
            },
            validation_messages,
        },
        response::order::{CreatedOrderResponse, OrderResponse},
    },
    model::status::RecordStatus,
    service::order::{OrderPricer, OrderTransactionExecutor},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    config::CustomerClaims,
    domain::responses::ApiResponse,
    errors::ServiceError,
    utils::{Method, Metrics, ServiceTracer},
};
use std::time::Duration;
use tracing::{info, warn};
use validator::Validate;

/// Attempts made with fresh invoices before an invoice conflict is surfaced.
pub const MAX_INVOICE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct OrderCommandService {
    pricer: OrderPricer,
    executor: OrderTransactionExecutor,
    command: DynOrderCommandRepository,
    invoices: DynInvoiceGenerator,
    tracer: ServiceTracer,
}

pub struct OrderCommandServiceDeps {
    pub products: DynProductQueryRepository,
    pub command: DynOrderCommandRepository,
    pub invoices: DynInvoiceGenerator,
    pub lock_timeout: Duration,
    pub transaction_timeout: Duration,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            products,
            command,
            invoices,
            lock_timeout,
            transaction_timeout,
        } = deps;

        let metrics = Metrics::new();
        metrics.register(registry, "order_command_service");

        Self {
            pricer: OrderPricer::new(products),
            executor: OrderTransactionExecutor::new(
                command.clone(),
                lock_timeout,
                transaction_timeout,
            ),
            command,
            invoices,
            tracer: ServiceTracer::new("order-command-service", metrics),
        }
    }

    async fn place_order(
        &self,
        customer: &CustomerClaims,
        req: &CreateOrderRequest,
    ) -> Result<CreatedOrderResponse, ServiceError> {
        req.validate()
            .map_err(|e| ServiceError::Validation(validation_messages(&e)))?;

        let priced = self.pricer.price(&req.products).await?;

        if priced.is_empty() {
            warn!(
                "📭 Every requested product is out of stock for customer {}",
                customer.id
            );
            return Err(ServiceError::OutOfStock);
        }

        let mut attempt = 1;
        loop {
            let invoice = self.invoices.generate();
            let (header, items) = build_records(&invoice, customer, req.payment, &priced);

            match self.executor.execute(&header, &items).await {
                Ok(()) => {
                    return Ok(CreatedOrderResponse {
                        invoice,
                        amount: priced.total,
                        excluded_products: priced.excluded.clone(),
                    });
                }
                Err(ServiceError::OrderPersistence(e))
                    if e.is_unique_violation() && attempt < MAX_INVOICE_ATTEMPTS =>
                {
                    warn!(
                        "🔁 Invoice {invoice} already taken, retrying ({attempt}/{MAX_INVOICE_ATTEMPTS})"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn build_records(
    invoice: &str,
    customer: &CustomerClaims,
    payment: bool,
    priced: &PricedOrder,
) -> (CreateOrderRecordRequest, Vec<CreateOrderItemRecordRequest>) {
    let header = CreateOrderRecordRequest {
        invoice: invoice.to_string(),
        customer_id: customer.id.clone(),
        amount: priced.total,
        payment,
        status: RecordStatus::Active,
        created_by: customer.name.clone(),
    };

    let items = priced
        .items
        .iter()
        .map(|line| CreateOrderItemRecordRequest {
            invoice: invoice.to_string(),
            product_id: line.product_id.clone(),
            qty: line.qty,
            price: line.price,
            amount: line.amount,
            status: RecordStatus::Active,
            created_by: customer.name.clone(),
        })
        .collect();

    (header, items)
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        customer: &CustomerClaims,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<CreatedOrderResponse>, ServiceError> {
        info!(
            "🏗️ Creating order for customer {} with {} line(s)",
            customer.id,
            req.products.len()
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.customer_id", customer.id.clone()),
            ],
        );

        match self.place_order(customer, req).await {
            Ok(created) => {
                self.tracer.success(
                    &tracing_ctx,
                    method,
                    &format!("Order {} created", created.invoice),
                );
                Ok(ApiResponse::success("Order created successfully", created))
            }
            Err(e) => {
                self.tracer.failure(&tracing_ctx, method, &e.to_string());
                Err(e)
            }
        }
    }

    async fn trash_order(
        &self,
        customer: &CustomerClaims,
        invoice: &str,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🗑️ Customer {} trashing order {invoice}", customer.id);

        let method = Method::Delete;
        let tracing_ctx = self.tracer.start(
            "trash_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "trash"),
                KeyValue::new("order.invoice", invoice.to_string()),
            ],
        );

        let req = TrashOrderRecordRequest {
            invoice: invoice.to_string(),
            customer_id: customer.id.clone(),
            updated_by: customer.name.clone(),
        };

        match self.command.trash_order(&req).await {
            Ok(order) => {
                self.tracer
                    .success(&tracing_ctx, method, &format!("Order {invoice} trashed"));
                Ok(ApiResponse::success(
                    "Order trashed successfully",
                    OrderResponse::from(order),
                ))
            }
            Err(e) if e.is_not_found() => {
                self.tracer
                    .failure(&tracing_ctx, method, &format!("Order {invoice} not found"));
                Err(ServiceError::NotFound(format!("Order {invoice} not found")))
            }
            Err(e) => {
                self.tracer.failure(&tracing_ctx, method, &e.to_string());
                Err(ServiceError::Repo(e))
            }
        }
    }
}

use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    domain::{
        requests::{order::FindMyOrders, validation_messages},
        response::{order::OrderResponse, order_item::OrderItemResponse},
    },
    model::status::RecordStatus,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::responses::{ApiResponse, ApiResponsePagination, Pagination},
    errors::ServiceError,
    utils::{Method, Metrics, ServiceTracer},
};
use tracing::info;
use validator::Validate;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    tracer: ServiceTracer,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, registry: &mut Registry) -> Self {
        let metrics = Metrics::new();
        metrics.register(registry, "order_query_service");

        Self {
            query,
            tracer: ServiceTracer::new("order-query-service", metrics),
        }
    }

    async fn list_orders(
        &self,
        customer_id: &str,
        req: &FindMyOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        req.validate()
            .map_err(|e| ServiceError::Validation(validation_messages(&e)))?;

        let (orders, total) = self.query.find_by_customer(customer_id, req).await?;
        let data: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

        Ok(ApiResponsePagination {
            status: "success".into(),
            message: "Orders retrieved successfully".into(),
            data,
            pagination: Pagination::new(req.page, req.limit, total),
        })
    }

    async fn list_items(
        &self,
        customer_id: &str,
        invoice: &str,
    ) -> Result<ApiResponse<Vec<OrderItemResponse>>, ServiceError> {
        let not_found = || ServiceError::NotFound(format!("Order {invoice} not found"));

        let order = self
            .query
            .find_by_invoice(invoice)
            .await?
            .ok_or_else(not_found)?;

        // Someone else's order and a trashed order look the same to the caller.
        if order.customer_id != customer_id || order.status == RecordStatus::Deleted.as_str() {
            return Err(not_found());
        }

        let items = self.query.find_items_by_invoice(invoice).await?;

        Ok(ApiResponse::success(
            "Order items retrieved successfully",
            items.into_iter().map(OrderItemResponse::from).collect(),
        ))
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_my_orders(
        &self,
        customer_id: &str,
        req: &FindMyOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        info!(
            "📋 Listing orders for customer {customer_id} | page={} limit={}",
            req.page, req.limit
        );

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_my_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_my_orders"),
                KeyValue::new("order.customer_id", customer_id.to_string()),
                KeyValue::new("page", req.page),
                KeyValue::new("limit", req.limit),
            ],
        );

        let result = self.list_orders(customer_id, req).await;
        match &result {
            Ok(response) => self.tracer.success(
                &tracing_ctx,
                method,
                &format!("Fetched {} orders", response.data.len()),
            ),
            Err(e) => self.tracer.failure(&tracing_ctx, method, &e.to_string()),
        }
        result
    }

    async fn find_my_order_items(
        &self,
        customer_id: &str,
        invoice: &str,
    ) -> Result<ApiResponse<Vec<OrderItemResponse>>, ServiceError> {
        info!("📦 Listing items of order {invoice} for customer {customer_id}");

        let method = Method::Get;
        let tracing_ctx = self.tracer.start(
            "find_my_order_items",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_my_order_items"),
                KeyValue::new("order.invoice", invoice.to_string()),
            ],
        );

        let result = self.list_items(customer_id, invoice).await;
        match &result {
            Ok(response) => self.tracer.success(
                &tracing_ctx,
                method,
                &format!("Fetched {} items of {invoice}", response.data.len()),
            ),
            Err(e) => self.tracer.failure(&tracing_ctx, method, &e.to_string()),
        }
        result
    }
}

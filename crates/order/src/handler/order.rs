use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::order::{CreateOrderRequest, FindMyOrders, InvoiceQuery},
        response::{
            order::{CreatedOrderResponse, OrderResponse},
            order_item::OrderItemResponse,
        },
    },
    middleware::{
        jwt::auth_middleware,
        validate::{SimpleValidatedJson, ValidatedQuery},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use shared::{
    config::CustomerClaims,
    domain::responses::{ApiResponse, ApiResponsePagination},
    errors::{ErrorResponse, HttpError},
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<CreatedOrderResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Insufficient or no stock", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Order service busy, retry", body = ErrorResponse)
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(customer): Extension<CustomerClaims>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&customer, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(FindMyOrders),
    responses(
        (status = 200, description = "Orders of the caller", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(customer): Extension<CustomerClaims>,
    ValidatedQuery(params): ValidatedQuery<FindMyOrders>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_my_orders(&customer.id, &params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/items",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(InvoiceQuery),
    responses(
        (status = 200, description = "Line items of the order", body = ApiResponse<Vec<OrderItemResponse>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn get_my_order_items(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(customer): Extension<CustomerClaims>,
    ValidatedQuery(params): ValidatedQuery<InvoiceQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service
        .find_my_order_items(&customer.id, &params.invoice)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/trash",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(InvoiceQuery),
    responses(
        (status = 200, description = "Order moved to trash", body = ApiResponse<OrderResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn trash_order_handler(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(customer): Extension<CustomerClaims>,
    ValidatedQuery(params): ValidatedQuery<InvoiceQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.trash_order(&customer, &params.invoice).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders", get(get_my_orders))
        .route("/api/orders/items", get(get_my_order_items))
        .route("/api/orders/trash", delete(trash_order_handler))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}

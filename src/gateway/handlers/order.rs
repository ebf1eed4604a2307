//! Order handlers (create, list, detail, cancel, status update)

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
};

use super::super::state::AppState;
use super::super::types::{
    ApiJson, ApiQuery, ApiResponse, ApiResult, CreateOrderRequest, OrderListQuery,
    OrderListResponse, OrderResponse, UpdateStatusRequest, created, ok, parse_id,
};
use crate::user_auth::Claims;

/// Create order
///
/// POST /api/v1/orders
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created as pending", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid order"),
        (status = 401, description = "Authentication failed"),
        (status = 404, description = "Laundry or service not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> ApiResult<OrderResponse> {
    let customer_id = claims.user_id()?;
    let order = state
        .orders
        .create(customer_id, req.into())
        .await
        .inspect_err(|e| tracing::warn!(customer_id = %customer_id, error = %e, "order rejected"))?;
    created(order.into())
}

/// Caller's orders, newest first
///
/// GET /api/v1/orders
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Page of orders", body = ApiResponse<OrderListResponse>),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Authentication failed")
    ),
    security(("jwt_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> ApiResult<OrderListResponse> {
    let customer_id = claims.user_id()?;
    let page = state
        .orders
        .list_for_customer(customer_id, query.status(), query.page_request())
        .await?;
    ok(page.into())
}

/// Order detail
///
/// GET /api/v1/orders/{id}
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Invalid order id"),
        (status = 403, description = "Not the caller's order"),
        (status = 404, description = "Order not found")
    ),
    security(("jwt_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<OrderResponse> {
    let customer_id = claims.user_id()?;
    let order_id = parse_id(&id, "order")?;
    let order = state.orders.get(customer_id, order_id).await?;
    ok(order.into())
}

/// Cancel a pending or confirmed order
///
/// PATCH /api/v1/orders/{id}/cancel
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/cancel",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Not the caller's order"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order can no longer be cancelled")
    ),
    security(("jwt_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<OrderResponse> {
    let customer_id = claims.user_id()?;
    let order_id = parse_id(&id, "order")?;
    let order = state
        .orders
        .cancel(customer_id, order_id)
        .await
        .inspect_err(|e| tracing::warn!(order_id = %order_id, error = %e, "cancel rejected"))?;
    ok(order.into())
}

/// Move an order to a new status (laundry owner only)
///
/// PATCH /api/v1/orders/{id}/status
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/status",
    params(("id" = String, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Caller does not own the order's laundry"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    ),
    security(("jwt_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateStatusRequest>,
) -> ApiResult<OrderResponse> {
    let owner_id = claims.user_id()?;
    let order_id = parse_id(&id, "order")?;
    let order = state
        .orders
        .update_status(owner_id, order_id, &req.status)
        .await
        .inspect_err(|e| {
            tracing::warn!(order_id = %order_id, status = %req.status, error = %e, "status update rejected")
        })?;
    ok(order.into())
}

//! Orders: customer history and admin fulfillment.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, Order, OrderFilter, OrderStatus};
use crate::errors::AppResult;
use crate::services::DashboardStats;
use crate::types::{Paginated, PaginatedOrders, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(list_orders)).route(
        "/:id",
        get(get_order).patch(update_status).put(update_status),
    )
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/stats", get(dashboard))
}

/// Own orders for customers; all orders, filterable, for admins
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(OrderFilter, PaginationParams),
    responses((status = 200, description = "One page of orders, newest first", body = PaginatedOrders))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<OrderFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Order>>> {
    let orders = state
        .services
        .orders()
        .list_orders(&actor, filter, page)
        .await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with items", body = Order),
        (status = 403, description = "Not your order"),
        (status = 404, description = "No such order")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.services.orders().get_order(&actor, id).await?))
}

#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order after the change", body = Order),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such order")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .services
        .orders()
        .update_status(&actor, id, payload.status)
        .await?;
    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store totals and latest orders", body = DashboardStats),
        (status = 403, description = "Admin only")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.services.stats().dashboard(&actor).await?))
}

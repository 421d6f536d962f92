//! The caller's cart.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, Cart, CartItem};
use crate::errors::AppResult;
use crate::types::Created;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[serde(default = "default_quantity")]
    #[schema(example = 1)]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Zero or less removes the line
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub cart_item_id: Uuid,
    #[schema(example = 3)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RemoveQuery {
    /// Line to remove; without it the whole cart is emptied
    pub item_id: Option<Uuid>,
}

pub fn cart_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_cart)
            .post(add_item)
            .put(update_item)
            .delete(remove_items),
    )
}

#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Cart with current prices", body = Cart))
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<Cart>> {
    Ok(Json(state.services.carts().get_cart(&actor).await?))
}

/// Add a product, merging with an existing line
#[utoipa::path(
    post,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Line after the merge", body = CartItem),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "No such product")
    )
)]
pub async fn add_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> AppResult<Created<CartItem>> {
    let item = state
        .services
        .carts()
        .add_item(&actor, payload.product_id, payload.quantity)
        .await?;
    Ok(Created(item))
}

#[utoipa::path(
    put,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Cart after the change", body = Cart),
        (status = 404, description = "Not a line of this cart")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<UpdateCartItemRequest>,
) -> AppResult<Json<Cart>> {
    let carts = state.services.carts();
    carts
        .update_item(&actor, payload.cart_item_id, payload.quantity)
        .await?;
    Ok(Json(carts.get_cart(&actor).await?))
}

#[utoipa::path(
    delete,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(RemoveQuery),
    responses(
        (status = 200, description = "Cart after the removal", body = Cart),
        (status = 404, description = "Not a line of this cart")
    )
)]
pub async fn remove_items(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<RemoveQuery>,
) -> AppResult<Json<Cart>> {
    let carts = state.services.carts();
    match query.item_id {
        Some(item_id) => carts.remove_item(&actor, item_id).await?,
        None => carts.clear(&actor).await?,
    }
    Ok(Json(carts.get_cart(&actor).await?))
}

//! Categories and products. Reads are public; writes go through the auth layer.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, Category, NewProduct, Product, ProductChanges};
use crate::errors::AppResult;
use crate::services::{CategoryInput, CategoryUpdate};
use crate::types::{Created, NoContent, Paginated, PaginatedProducts, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Home & Garden")]
    pub name: String,
    pub description: Option<String>,
}

/// Renaming re-derives the slug
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    #[schema(example = "Wireless Headphones")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = f64, example = 59.99)]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Only products in this category
    pub category_id: Option<Uuid>,
}

/// Public catalog reads
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/:id", get(get_category))
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

/// Catalog writes; the services enforce the admin role
pub fn catalog_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    responses((status = 200, description = "All categories by name", body = Vec<Category>))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.services.catalog().list_categories().await?))
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "No such category")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    Ok(Json(state.services.catalog().get_category(id).await?))
}

#[utoipa::path(
    post,
    path = "/categories",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> AppResult<Created<Category>> {
    let input = CategoryInput {
        name: payload.name,
        description: payload.description,
    };
    let category = state.services.catalog().create_category(&actor, input).await?;
    Ok(Created(category))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such category")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let input = CategoryUpdate {
        name: payload.name,
        description: payload.description,
    };
    let category = state
        .services
        .catalog()
        .update_category(&actor, id, input)
        .await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Category still has products"),
        (status = 404, description = "No such category")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.catalog().delete_category(&actor, id).await?;
    Ok(NoContent)
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "Catalog",
    params(ProductQuery, PaginationParams),
    responses((status = 200, description = "One page of products", body = PaginatedProducts))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Product>>> {
    let products = state
        .services
        .catalog()
        .list_products(query.category_id, page)
        .await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "No such product")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    Ok(Json(state.services.catalog().get_product(id).await?))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid price, stock or category"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<Created<Product>> {
    let product = NewProduct {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        stock: payload.stock,
        images: payload.images,
        category_id: payload.category_id,
    };
    let product = state.services.catalog().create_product(&actor, product).await?;
    Ok(Created(product))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such product")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let changes = ProductChanges {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        stock: payload.stock,
        images: payload.images,
        category_id: payload.category_id,
    };
    let product = state
        .services
        .catalog()
        .update_product(&actor, id, changes)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such product")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.services.catalog().delete_product(&actor, id).await?;
    Ok(NoContent)
}

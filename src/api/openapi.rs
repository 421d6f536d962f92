//! OpenAPI document served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, cart_handler, catalog_handler, checkout_handler, order_handler, user_handler,
};
use crate::domain::{
    Cart, CartItem, CartLine, Category, Order, OrderItem, OrderStatus, Product, UserResponse,
    UserRole,
};
use crate::services::{DashboardStats, TokenResponse};
use crate::types::{PaginatedOrders, PaginatedProducts, PaginationMeta, WebhookAck};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Catalog, cart, hosted checkout and webhook-driven orders"
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::update_role,
        catalog_handler::list_categories,
        catalog_handler::get_category,
        catalog_handler::create_category,
        catalog_handler::update_category,
        catalog_handler::delete_category,
        catalog_handler::list_products,
        catalog_handler::get_product,
        catalog_handler::create_product,
        catalog_handler::update_product,
        catalog_handler::delete_product,
        cart_handler::get_cart,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_items,
        checkout_handler::create_session,
        checkout_handler::stripe_webhook,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::update_status,
        order_handler::dashboard,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            TokenResponse,
            Category,
            Product,
            CartItem,
            CartLine,
            Cart,
            Order,
            OrderItem,
            OrderStatus,
            PaginationMeta,
            PaginatedProducts,
            PaginatedOrders,
            DashboardStats,
            WebhookAck,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateRoleRequest,
            catalog_handler::CreateCategoryRequest,
            catalog_handler::UpdateCategoryRequest,
            catalog_handler::CreateProductRequest,
            catalog_handler::UpdateProductRequest,
            cart_handler::AddToCartRequest,
            cart_handler::UpdateCartItemRequest,
            checkout_handler::CheckoutRequest,
            checkout_handler::CheckoutSessionResponse,
            order_handler::UpdateOrderStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup and login"),
        (name = "Users", description = "Profile and user administration"),
        (name = "Catalog", description = "Categories and products"),
        (name = "Cart", description = "The caller's cart"),
        (name = "Checkout", description = "Hosted checkout and payment webhooks"),
        (name = "Orders", description = "Order history and fulfillment"),
        (name = "Admin", description = "Dashboard")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_checkout_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/checkout/session"));
        assert!(doc.paths.paths.contains_key("/webhooks/stripe"));
        assert!(doc.paths.paths.contains_key("/orders/{id}"));
    }
}

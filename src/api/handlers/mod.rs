//! HTTP request handlers.

pub mod auth_handler;
pub mod cart_handler;
pub mod catalog_handler;
pub mod checkout_handler;
pub mod order_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use cart_handler::cart_routes;
pub use catalog_handler::{catalog_admin_routes, catalog_routes};
pub use checkout_handler::{checkout_routes, webhook_routes};
pub use order_handler::{admin_routes, order_routes};
pub use user_handler::user_routes;

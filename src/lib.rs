//! Storefront API: catalog, cart, hosted checkout, and orders that
//! materialize from the payment processor's webhook exactly once.
//!
//! # Layers
//!
//! - **cli** / **commands**: `serve`, `migrate`, `promote`, `seed`
//! - **config**: environment settings and shared constants
//! - **domain**: entities, value objects and the order lifecycle
//! - **services**: use cases, authorized through an explicit [`domain::Actor`]
//! - **infra**: SeaORM repositories, migrations and the Stripe gateway
//! - **api**: axum handlers, middleware, routes and the OpenAPI document
//! - **types**: pagination and response helpers
//! - **errors**: the application error and its HTTP mapping
//!
//! ```bash
//! storefront migrate up
//! storefront seed
//! storefront serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Order, OrderStatus, User, UserRole};
pub use errors::{AppError, AppResult};

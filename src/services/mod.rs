//! Application services: the storefront's use cases.
//!
//! Each service is a trait plus a `*Manager` implementation generic over the
//! [`UnitOfWork`](crate::infra::UnitOfWork). Anything that needs
//! authorization takes the caller's [`Actor`](crate::domain::Actor).

mod auth_service;
mod cart_service;
mod catalog_service;
mod checkout_service;
pub mod container;
mod order_service;
mod payment_service;
mod stats_service;
mod user_service;

pub use container::{parallel, ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use cart_service::{CartManager, CartService};
pub use catalog_service::{CatalogManager, CatalogService, CategoryInput, CategoryUpdate};
pub use checkout_service::{CheckoutManager, CheckoutService, ShippingDetails};
pub use order_service::{OrderManager, OrderService};
pub use payment_service::{PaymentConfirmation, PaymentConfirmationService, WebhookOutcome};
pub use stats_service::{DashboardStats, StatsManager, StatsService};
pub use user_service::{CreateUserInput, UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

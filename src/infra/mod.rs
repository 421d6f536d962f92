//! Infrastructure layer: PostgreSQL through SeaORM and the payment processor.

pub mod db;
pub mod payments;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use payments::{
    CheckoutLineItem, CheckoutSessionRequest, CompletedCheckout, HostedCheckout, PaymentEvent,
    PaymentGateway, PurchasedItem, StripeGateway,
};
pub use repositories::{
    CartRepository, CartStore, CategoryRepository, CategoryStore, OrderRepository, OrderStore,
    ProductRepository, ProductStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, RepositorySet, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use payments::MockPaymentGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCartRepository, MockCategoryRepository, MockOrderRepository, MockProductRepository,
    MockUserRepository,
};

//! Service container: one place that wires every service to its backends.

use std::future::Future;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, CartManager, CartService, CatalogManager, CatalogService,
    CheckoutManager, CheckoutService, OrderManager, OrderService, PaymentConfirmation,
    PaymentConfirmationService, StatsManager, StatsService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{PaymentGateway, Persistence, StripeGateway, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn catalog(&self) -> Arc<dyn CatalogService>;
    fn carts(&self) -> Arc<dyn CartService>;
    fn checkout(&self) -> Arc<dyn CheckoutService>;
    fn payments(&self) -> Arc<dyn PaymentConfirmationService>;
    fn orders(&self) -> Arc<dyn OrderService>;
    fn stats(&self) -> Arc<dyn StatsService>;
}

pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    catalog_service: Arc<dyn CatalogService>,
    cart_service: Arc<dyn CartService>,
    checkout_service: Arc<dyn CheckoutService>,
    payment_service: Arc<dyn PaymentConfirmationService>,
    order_service: Arc<dyn OrderService>,
    stats_service: Arc<dyn StatsService>,
}

impl Services {
    /// Wire every service over the given repositories and payment gateway.
    pub fn new<U: UnitOfWork + 'static>(
        uow: Arc<U>,
        gateway: Arc<dyn PaymentGateway>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            catalog_service: Arc::new(CatalogManager::new(uow.clone())),
            cart_service: Arc::new(CartManager::new(uow.clone())),
            checkout_service: Arc::new(CheckoutManager::new(uow.clone(), gateway.clone(), config)),
            payment_service: Arc::new(PaymentConfirmation::new(uow.clone(), gateway)),
            order_service: Arc::new(OrderManager::new(uow.clone())),
            stats_service: Arc::new(StatsManager::new(uow)),
        }
    }

    /// Production wiring: PostgreSQL repositories and the Stripe gateway.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let gateway = Arc::new(StripeGateway::new(
            config.stripe_secret_key(),
            config.stripe_webhook_secret(),
        ));
        Self::new(uow, gateway, config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn checkout(&self) -> Arc<dyn CheckoutService> {
        self.checkout_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentConfirmationService> {
        self.payment_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }

    fn stats(&self) -> Arc<dyn StatsService> {
        self.stats_service.clone()
    }
}

/// Run independent fallible operations concurrently; the first error wins.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

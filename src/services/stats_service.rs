//! Admin dashboard figures.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::parallel;
use crate::config::DASHBOARD_RECENT_ORDERS;
use crate::domain::{Actor, Order};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_products: u64,
    pub total_orders: u64,
    /// Sum of totals over orders that were not cancelled
    #[schema(value_type = f64)]
    pub revenue: Decimal,
    pub recent_orders: Vec<Order>,
}

#[async_trait]
pub trait StatsService: Send + Sync {
    async fn dashboard(&self, actor: &Actor) -> AppResult<DashboardStats>;
}

pub struct StatsManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StatsManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StatsService for StatsManager<U> {
    async fn dashboard(&self, actor: &Actor) -> AppResult<DashboardStats> {
        actor.require_admin()?;

        let users = self.uow.users();
        let products = self.uow.products();
        let orders = self.uow.orders();

        let ((total_users, total_products, total_orders, revenue), recent_orders) =
            parallel::join2(
                parallel::join4(users.count(), products.count(), orders.count(), orders.revenue()),
                orders.recent(DASHBOARD_RECENT_ORDERS),
            )
            .await?;

        Ok(DashboardStats {
            total_users,
            total_products,
            total_orders,
            revenue,
            recent_orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::errors::AppError;
    use crate::infra::{
        MockOrderRepository, MockProductRepository, MockUserRepository, RepositorySet,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_dashboard_aggregates() {
        let mut users = MockUserRepository::new();
        users.expect_count().returning(|| Ok(3));
        let mut products = MockProductRepository::new();
        products.expect_count().returning(|| Ok(12));
        let mut orders = MockOrderRepository::new();
        orders.expect_count().returning(|| Ok(4));
        orders.expect_revenue().returning(|| Ok(dec!(99.50)));
        orders
            .expect_recent()
            .withf(|limit| *limit == DASHBOARD_RECENT_ORDERS)
            .returning(|_| Ok(vec![]));

        let service = StatsManager::new(Arc::new(RepositorySet {
            users: Arc::new(users),
            products: Arc::new(products),
            orders: Arc::new(orders),
            ..Default::default()
        }));
        let admin = Actor::new(Uuid::new_v4(), "a@example.com", UserRole::Admin);
        let stats = service.dashboard(&admin).await.unwrap();

        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.total_products, 12);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.revenue, dec!(99.50));
    }

    #[tokio::test]
    async fn test_dashboard_requires_admin() {
        let service = StatsManager::new(Arc::new(RepositorySet::default()));
        let customer = Actor::new(Uuid::new_v4(), "c@example.com", UserRole::Customer);
        assert!(matches!(
            service.dashboard(&customer).await,
            Err(AppError::Forbidden)
        ));
    }
}

//! Order lookup and fulfillment updates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, Order, OrderFilter, OrderStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait OrderService: Send + Sync {
    /// Admins see every order (filterable); everyone else only their own.
    async fn list_orders(
        &self,
        actor: &Actor,
        filter: OrderFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Order>>;

    /// Owner or admin only.
    async fn get_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order>;

    /// Admin only; the move must be allowed by the order lifecycle.
    async fn update_status(&self, actor: &Actor, id: Uuid, status: OrderStatus)
        -> AppResult<Order>;
}

pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn list_orders(
        &self,
        actor: &Actor,
        filter: OrderFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<Order>> {
        let filter = if actor.is_admin() {
            filter
        } else {
            OrderFilter {
                user_id: Some(actor.id),
                ..filter
            }
        };

        let (orders, total) = self.uow.orders().list(filter, page).await?;
        Ok(Paginated::new(orders, page, total))
    }

    async fn get_order(&self, actor: &Actor, id: Uuid) -> AppResult<Order> {
        let order = self.uow.orders().find_by_id(id).await?.ok_or_not_found()?;
        actor.require_owner_or_admin(order.user_id)?;
        Ok(order)
    }

    async fn update_status(
        &self,
        actor: &Actor,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Order> {
        actor.require_admin()?;

        let order = self.uow.orders().find_by_id(id).await?.ok_or_not_found()?;
        if order.status == status {
            return Ok(order);
        }
        if !order.status.can_transition_to(status) {
            return Err(AppError::validation(format!(
                "Cannot move order from {} to {}",
                order.status, status
            )));
        }

        let updated = self.uow.orders().update_status(id, status).await?;
        tracing::info!(
            order_id = %id,
            admin_id = %actor.id,
            from = %order.status,
            to = %status,
            "Order status updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockOrderRepository, RepositorySet};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn order(user_id: Uuid, status: OrderStatus) -> Order {
        Order {
            id: Uuid::new_v4(),
            user_id,
            status,
            total: dec!(25.00),
            shipping_name: "Ada".into(),
            shipping_email: "ada@example.com".into(),
            shipping_address: "1 Main St".into(),
            payment_reference: Some("cs_1".into()),
            payment_intent_id: None,
            requires_review: false,
            review_note: None,
            items: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn manager(orders: MockOrderRepository) -> OrderManager<RepositorySet> {
        OrderManager::new(Arc::new(RepositorySet {
            orders: Arc::new(orders),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_non_owner_gets_forbidden() {
        let owner = Uuid::new_v4();
        let stored = order(owner, OrderStatus::Processing);
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let stranger = Actor::new(Uuid::new_v4(), "x@example.com", UserRole::Customer);
        let result = manager(orders).get_order(&stranger, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_admin_reads_any_order() {
        let stored = order(Uuid::new_v4(), OrderStatus::Processing);
        let id = stored.id;
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));

        let admin = Actor::new(Uuid::new_v4(), "a@example.com", UserRole::Admin);
        assert_eq!(manager(orders).get_order(&admin, id).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_customer_listing_is_forced_to_own_orders() {
        let caller = Actor::new(Uuid::new_v4(), "c@example.com", UserRole::Customer);
        let caller_id = caller.id;
        let mut orders = MockOrderRepository::new();
        orders
            .expect_list()
            .withf(move |filter, _| filter.user_id == Some(caller_id))
            .returning(|_, _| Ok((vec![], 0)));

        let filter = OrderFilter {
            status: None,
            user_id: Some(Uuid::new_v4()),
        };
        let page = manager(orders)
            .list_orders(&caller, filter, PaginationParams::default())
            .await
            .unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[tokio::test]
    async fn test_backward_transition_rejected() {
        let stored = order(Uuid::new_v4(), OrderStatus::Shipped);
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        orders.expect_update_status().never();

        let admin = Actor::new(Uuid::new_v4(), "a@example.com", UserRole::Admin);
        let result = manager(orders)
            .update_status(&admin, Uuid::new_v4(), OrderStatus::Pending)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_customer_cannot_update_status() {
        let mut orders = MockOrderRepository::new();
        orders.expect_find_by_id().never();

        let customer = Actor::new(Uuid::new_v4(), "c@example.com", UserRole::Customer);
        let result = manager(orders)
            .update_status(&customer, Uuid::new_v4(), OrderStatus::Shipped)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}

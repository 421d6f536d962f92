//! The caller's own shopping cart.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, Cart, CartItem};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait CartService: Send + Sync {
    async fn get_cart(&self, actor: &Actor) -> AppResult<Cart>;

    /// Add `quantity` (at least 1) of a product, merging with an existing line.
    async fn add_item(&self, actor: &Actor, product_id: Uuid, quantity: i32)
        -> AppResult<CartItem>;

    /// Set the quantity of a line; zero or less removes it.
    async fn update_item(
        &self,
        actor: &Actor,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartItem>>;

    async fn remove_item(&self, actor: &Actor, item_id: Uuid) -> AppResult<()>;

    async fn clear(&self, actor: &Actor) -> AppResult<()>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn get_cart(&self, actor: &Actor) -> AppResult<Cart> {
        let lines = self.uow.carts().lines(actor.id).await?;
        Ok(Cart::new(lines))
    }

    async fn add_item(
        &self,
        actor: &Actor,
        product_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartItem> {
        if quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
        if self.uow.products().find_by_id(product_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        self.uow.carts().add(actor.id, product_id, quantity).await
    }

    async fn update_item(
        &self,
        actor: &Actor,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartItem>> {
        self.uow.carts().set_quantity(actor.id, item_id, quantity).await
    }

    async fn remove_item(&self, actor: &Actor, item_id: Uuid) -> AppResult<()> {
        self.uow.carts().remove(actor.id, item_id).await
    }

    async fn clear(&self, actor: &Actor) -> AppResult<()> {
        let removed = self.uow.carts().clear(actor.id).await?;
        tracing::debug!(user_id = %actor.id, removed, "Cart cleared");
        Ok(())
    }
}

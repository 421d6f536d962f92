//! Cart repository. Every query is scoped by the owning user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::cart_item::{self, ActiveModel, Entity as CartItemEntity};
use super::entities::product::Entity as ProductEntity;
use crate::domain::{CartItem, CartLine, Product};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Cart rows joined with their products, oldest first
    async fn lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>>;

    /// Insert the (user, product) row or add `quantity` to the existing one, atomically.
    async fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem>;

    /// Overwrite the quantity of one of the user's rows.
    ///
    /// A quantity of zero or less deletes the row and yields `None`.
    /// `NotFound` when the row does not exist or belongs to another user.
    async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartItem>>;

    async fn remove(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()>;

    /// Delete every row of the user's cart, returning how many were removed.
    async fn clear(&self, user_id: Uuid) -> AppResult<u64>;

    /// Delete the user's rows first added at or before `cutoff`.
    ///
    /// Rows added after an order was placed belong to the next purchase.
    async fn clear_added_before(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn lines(&self, user_id: Uuid) -> AppResult<Vec<CartLine>> {
        let rows = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_asc(cart_item::Column::CreatedAt)
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| {
                product.map(|product| CartLine {
                    id: item.id,
                    quantity: item.quantity,
                    product: Product::from(product),
                })
            })
            .collect())
    }

    async fn add(&self, user_id: Uuid, product_id: Uuid, quantity: i32) -> AppResult<CartItem> {
        let now = chrono::Utc::now();
        let row = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let on_conflict = OnConflict::columns([cart_item::Column::UserId, cart_item::Column::ProductId])
            .value(
                cart_item::Column::Quantity,
                Expr::col((CartItemEntity, cart_item::Column::Quantity)).add(quantity),
            )
            .value(cart_item::Column::UpdatedAt, Expr::value(now))
            .to_owned();

        let model = CartItemEntity::insert(row)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await?;
        Ok(CartItem::from(model))
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Option<CartItem>> {
        if quantity <= 0 {
            self.remove(user_id, item_id).await?;
            return Ok(None);
        }

        let existing = CartItemEntity::find_by_id(item_id)
            .filter(cart_item::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Some(CartItem::from(model)))
    }

    async fn remove(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let result = CartItemEntity::delete_many()
            .filter(cart_item::Column::Id.eq(item_id))
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<u64> {
        let result = CartItemEntity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn clear_added_before(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = CartItemEntity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::CreatedAt.lte(cutoff))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

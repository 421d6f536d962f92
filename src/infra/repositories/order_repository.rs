//! Order repository. Orders are always returned with their items.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IsolationLevel, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::order::{self, into_order, Entity as OrderEntity};
use super::entities::order_item::{self, Entity as OrderItemEntity};
use crate::domain::{NewOrder, Order, OrderFilter, OrderStatus};
use crate::errors::{map_unique_violation, AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order and all of its items in one transaction.
    ///
    /// A second order with the same payment reference fails with `Conflict`.
    async fn create_with_items(&self, order: NewOrder) -> AppResult<Order>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    async fn find_by_payment_reference(&self, reference: &str) -> AppResult<Option<Order>>;

    /// One page of all orders matching the filter, newest first, plus the total count
    async fn list(
        &self,
        filter: OrderFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order>;

    async fn count(&self) -> AppResult<u64>;

    /// Sum of totals over orders that were not cancelled
    async fn revenue(&self) -> AppResult<Decimal>;

    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>>;
}

pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_items(&self, models: Vec<order::Model>) -> AppResult<Vec<Order>> {
        let items = models.load_many(OrderItemEntity, &self.db).await?;
        models
            .into_iter()
            .zip(items)
            .map(|(model, items)| into_order(model, items))
            .collect()
    }

    async fn load_one(&self, model: Option<order::Model>) -> AppResult<Option<Order>> {
        match model {
            Some(model) => Ok(self.with_items(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }
}

async fn insert_order_rows<C: ConnectionTrait>(conn: &C, new_order: NewOrder) -> AppResult<Order> {
    let now = chrono::Utc::now();
    let order_id = Uuid::new_v4();

    let header = order::ActiveModel {
        id: Set(order_id),
        user_id: Set(new_order.user_id),
        status: Set(new_order.status.to_string()),
        total: Set(new_order.total),
        shipping_name: Set(new_order.shipping_name),
        shipping_email: Set(new_order.shipping_email),
        shipping_address: Set(new_order.shipping_address),
        payment_reference: Set(new_order.payment_reference),
        payment_intent_id: Set(new_order.payment_intent_id),
        requires_review: Set(new_order.requires_review),
        review_note: Set(new_order.review_note),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| map_unique_violation(e, "Order"))?;

    let mut items = Vec::with_capacity(new_order.items.len());
    for item in new_order.items {
        let row = order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(item.product_id),
            name: Set(item.name),
            quantity: Set(item.quantity),
            price: Set(item.price),
            created_at: Set(now),
        }
        .insert(conn)
        .await?;
        items.push(row);
    }

    into_order(header, items)
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create_with_items(&self, new_order: NewOrder) -> AppResult<Order> {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await?;

        match insert_order_rows(&txn, new_order).await {
            Ok(order) => {
                txn.commit().await?;
                Ok(order)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let model = OrderEntity::find_by_id(id).one(&self.db).await?;
        self.load_one(model).await
    }

    async fn find_by_payment_reference(&self, reference: &str) -> AppResult<Option<Order>> {
        let model = OrderEntity::find()
            .filter(order::Column::PaymentReference.eq(reference))
            .one(&self.db)
            .await?;
        self.load_one(model).await
    }

    async fn list(
        &self,
        filter: OrderFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let mut query = OrderEntity::find().order_by_desc(order::Column::CreatedAt);
        if let Some(status) = filter.status {
            query = query.filter(order::Column::Status.eq(status.as_str()));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(order::Column::UserId.eq(user_id));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;

        Ok((self.with_items(models).await?, total))
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let existing = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        self.load_one(Some(model)).await?.ok_or(AppError::NotFound)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(OrderEntity::find().count(&self.db).await?)
    }

    async fn revenue(&self) -> AppResult<Decimal> {
        let sum: Option<Option<Decimal>> = OrderEntity::find()
            .select_only()
            .column_as(Expr::col(order::Column::Total).sum(), "revenue")
            .filter(order::Column::Status.ne(OrderStatus::Cancelled.as_str()))
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(sum.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<Order>> {
        let models = OrderEntity::find()
            .order_by_desc(order::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        self.with_items(models).await
    }
}

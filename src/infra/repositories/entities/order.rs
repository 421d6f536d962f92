//! Order database entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Order, OrderItem};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total: Decimal,
    pub shipping_name: String,
    pub shipping_email: String,
    #[sea_orm(column_type = "Text")]
    pub shipping_address: String,
    #[sea_orm(unique)]
    pub payment_reference: Option<String>,
    pub payment_intent_id: Option<String>,
    pub requires_review: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub review_note: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Assemble a domain order from its row and item rows.
///
/// Fails on a status string outside the lifecycle.
pub fn into_order(model: Model, items: Vec<super::order_item::Model>) -> Result<Order, AppError> {
    let status = model.status.parse().map_err(|_| {
        AppError::internal(format!(
            "Order {} has unknown status {}",
            model.id, model.status
        ))
    })?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        status,
        total: model.total,
        shipping_name: model.shipping_name,
        shipping_email: model.shipping_email,
        shipping_address: model.shipping_address,
        payment_reference: model.payment_reference,
        payment_intent_id: model.payment_intent_id,
        requires_review: model.requires_review,
        review_note: model.review_note,
        items: items.into_iter().map(OrderItem::from).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

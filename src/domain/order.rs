//! Order aggregate: order header, line items and the status lifecycle.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::errors::AppError;

/// Order lifecycle.
///
/// `Pending → Processing → Shipped → Delivered`, with `Cancelled` reachable
/// from any non-final state. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Position along the fulfillment path; `None` for `Cancelled`.
    const fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipped => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether an administrator may move an order from `self` to `next`.
    ///
    /// Re-applying the current status is accepted as a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (Some(current), Some(target)) => target > current,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::validation(format!("Invalid order status: {}", other))),
        }
    }
}

/// Line of a placed order; price is the unit price at purchase time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    /// `None` when the purchased line could not be matched to a product
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Placed order with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    /// Amount actually charged by the payment processor
    #[schema(value_type = f64, example = 25.0)]
    pub total: Decimal,
    pub shipping_name: String,
    pub shipping_email: String,
    pub shipping_address: String,
    /// Processor checkout-session id; unique per order
    pub payment_reference: Option<String>,
    pub payment_intent_id: Option<String>,
    pub requires_review: bool,
    pub review_note: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of unit price times quantity over all items
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// Item to insert together with a new order
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: Option<Uuid>,
    pub name: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl NewOrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order header plus items, written as one unit
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total: Decimal,
    pub shipping_name: String,
    pub shipping_email: String,
    pub shipping_address: String,
    pub payment_reference: Option<String>,
    pub payment_intent_id: Option<String>,
    pub requires_review: bool,
    pub review_note: Option<String>,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(NewOrderItem::line_total).sum()
    }

    /// Flag the order for manual reconciliation, appending to any existing note.
    pub fn flag_for_review(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.requires_review = true;
        self.review_note = Some(match self.review_note.take() {
            Some(existing) => format!("{}; {}", existing, note),
            None => note,
        });
    }
}

/// Admin listing filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    /// Only orders in this status
    pub status: Option<OrderStatus>,
    /// Only orders placed by this customer
    pub user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Shipped));
    }

    #[test]
    fn test_cancelled_is_absorbing() {
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("paid".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_flag_for_review_appends_notes() {
        let mut order = NewOrder {
            user_id: Uuid::new_v4(),
            status: OrderStatus::Processing,
            total: dec!(25.00),
            shipping_name: "Ada".to_string(),
            shipping_email: "ada@example.com".to_string(),
            shipping_address: "1 Main St".to_string(),
            payment_reference: Some("cs_test_1".to_string()),
            payment_intent_id: None,
            requires_review: false,
            review_note: None,
            items: vec![NewOrderItem {
                product_id: None,
                name: "Mystery".to_string(),
                quantity: 2,
                price: dec!(12.50),
            }],
        };
        assert_eq!(order.items_total(), dec!(25.00));

        order.flag_for_review("first");
        order.flag_for_review("second");
        assert!(order.requires_review);
        assert_eq!(order.review_note.as_deref(), Some("first; second"));
    }
}

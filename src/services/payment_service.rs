//! Payment confirmation: turns a verified `checkout.session.completed`
//! delivery into exactly one order.
//!
//! Per delivery: verify signature → ignore anything but completed checkouts →
//! skip if an order already carries the session id → re-read the session from
//! the processor → resolve the buyer and the products → write order + items
//! in one transaction → empty the buyer's cart.
//!
//! Sessions paid with a delayed method settle as `PENDING`; the later
//! `async_payment_succeeded` / `async_payment_failed` delivery moves that
//! order to `PROCESSING` or `CANCELLED`.
//!
//! Errors returned from [`PaymentConfirmationService::handle_webhook`] are
//! either a signature failure (reject) or something a redelivery may fix
//! (`AppError::is_retryable`). Problems no redelivery can fix are reported
//! as [`WebhookOutcome::Unreconcilable`] and acknowledged.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    METADATA_SHIPPING_ADDRESS, METADATA_SHIPPING_EMAIL, METADATA_SHIPPING_NAME, METADATA_USER_ID,
};
use crate::domain::money::from_minor_units;
use crate::domain::{NewOrder, NewOrderItem, Order, OrderStatus, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{CompletedCheckout, PaymentEvent, PaymentGateway, UnitOfWork};

/// What a webhook delivery amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Verified, but not an event the storefront acts on
    Ignored { event_type: String },
    /// A new order was written
    Settled { order_id: Uuid, requires_review: bool },
    /// An order for this session already exists; nothing was written
    AlreadySettled { order_id: Uuid },
    /// A delayed payment cleared or failed; the order now has `status`
    PaymentResolved { order_id: Uuid, status: OrderStatus },
    /// Cannot be turned into an order; left for manual reconciliation
    Unreconcilable { session_id: String, reason: String },
}

#[async_trait]
pub trait PaymentConfirmationService: Send + Sync {
    async fn handle_webhook(&self, payload: &str, signature: &str) -> AppResult<WebhookOutcome>;
}

pub struct PaymentConfirmation<U: UnitOfWork> {
    uow: Arc<U>,
    gateway: Arc<dyn PaymentGateway>,
}

impl<U: UnitOfWork> PaymentConfirmation<U> {
    pub fn new(uow: Arc<U>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { uow, gateway }
    }

    async fn settle(&self, session_id: &str) -> AppResult<WebhookOutcome> {
        let orders = self.uow.orders();

        if let Some(existing) = orders.find_by_payment_reference(session_id).await? {
            tracing::info!(session_id, order_id = %existing.id, "Checkout already settled");
            // An earlier delivery may have committed the order but died before this
            self.clear_cart(&existing).await;
            return Ok(WebhookOutcome::AlreadySettled {
                order_id: existing.id,
            });
        }

        let checkout = self.gateway.fetch_completed_checkout(session_id).await?;

        let buyer = match self.resolve_buyer(&checkout.metadata).await? {
            Ok(user) => user,
            Err(reason) => {
                tracing::warn!(session_id, %reason, "Checkout cannot be reconciled to a user");
                return Ok(WebhookOutcome::Unreconcilable {
                    session_id: session_id.to_string(),
                    reason,
                });
            }
        };

        let new_order = self.build_order(&buyer, checkout).await?;
        let requires_review = new_order.requires_review;
        if requires_review {
            tracing::warn!(
                session_id,
                note = new_order.review_note.as_deref().unwrap_or_default(),
                "Order flagged for review"
            );
        }

        let order = match orders.create_with_items(new_order).await {
            Ok(order) => order,
            // Lost the race against a concurrent delivery of the same session
            Err(AppError::Conflict(_)) => {
                let existing = orders
                    .find_by_payment_reference(session_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal("Payment reference conflict without an existing order")
                    })?;
                tracing::info!(session_id, order_id = %existing.id, "Concurrent delivery already settled");
                return Ok(WebhookOutcome::AlreadySettled {
                    order_id: existing.id,
                });
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            session_id,
            order_id = %order.id,
            user_id = %buyer.id,
            total = %order.total,
            status = %order.status,
            "Order materialized"
        );

        self.clear_cart(&order).await;

        Ok(WebhookOutcome::Settled {
            order_id: order.id,
            requires_review,
        })
    }

    /// Best-effort: empty what the buyer had in the cart when the order was
    /// placed. Rows added afterwards are kept.
    async fn clear_cart(&self, order: &Order) {
        if let Err(e) = self
            .uow
            .carts()
            .clear_added_before(order.user_id, order.created_at)
            .await
        {
            tracing::warn!(user_id = %order.user_id, error = %e, "Failed to clear cart after checkout");
        }
    }

    /// Move a `PENDING` order to the status a delayed payment resolved to.
    ///
    /// When the completion was never processed the session is settled
    /// first. Orders no longer `PENDING` are left alone.
    async fn resolve_delayed_payment(
        &self,
        session_id: &str,
        status: OrderStatus,
    ) -> AppResult<WebhookOutcome> {
        let orders = self.uow.orders();

        let order = match orders.find_by_payment_reference(session_id).await? {
            Some(order) => order,
            None => {
                let order_id = match self.settle(session_id).await? {
                    WebhookOutcome::Settled { order_id, .. }
                    | WebhookOutcome::AlreadySettled { order_id } => order_id,
                    other => return Ok(other),
                };
                orders
                    .find_by_id(order_id)
                    .await?
                    .ok_or_else(|| AppError::internal("Settled order not found"))?
            }
        };

        if order.status != OrderStatus::Pending {
            if order.status != status {
                tracing::warn!(
                    session_id,
                    order_id = %order.id,
                    current = %order.status,
                    reported = %status,
                    "Delayed payment result for an order that is no longer pending"
                );
            }
            return Ok(WebhookOutcome::PaymentResolved {
                order_id: order.id,
                status: order.status,
            });
        }

        let updated = orders.update_status(order.id, status).await?;
        tracing::info!(session_id, order_id = %updated.id, status = %updated.status, "Delayed payment resolved");
        Ok(WebhookOutcome::PaymentResolved {
            order_id: updated.id,
            status: updated.status,
        })
    }

    /// Inner `Err` is a reconciliation reason, outer `Err` a retryable failure.
    async fn resolve_buyer(
        &self,
        metadata: &HashMap<String, String>,
    ) -> AppResult<Result<User, String>> {
        let raw = match metadata.get(METADATA_USER_ID) {
            Some(raw) => raw,
            None => return Ok(Err("session metadata has no user id".to_string())),
        };
        let user_id = match Uuid::parse_str(raw) {
            Ok(id) => id,
            Err(_) => return Ok(Err(format!("session user id {:?} is not a uuid", raw))),
        };

        Ok(self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| format!("no user with id {}", user_id)))
    }

    async fn build_order(&self, buyer: &User, checkout: CompletedCheckout) -> AppResult<NewOrder> {
        let wanted: Vec<Uuid> = checkout
            .line_items
            .iter()
            .filter_map(|item| item.product_id)
            .collect();
        let products: HashMap<Uuid, String> = self
            .uow
            .products()
            .find_by_ids(wanted)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        let mut notes = Vec::new();
        let mut items = Vec::with_capacity(checkout.line_items.len());
        for purchased in checkout.line_items {
            let quantity = i32::try_from(purchased.quantity)
                .map_err(|_| AppError::internal("Line item quantity out of range"))?;
            let resolved = purchased
                .product_id
                .and_then(|id| products.get(&id).map(|name| (id, name.clone())));

            if !purchased.is_exact() {
                notes.push(format!(
                    "line item '{}' charged {} for {} units of {}",
                    purchased.description,
                    from_minor_units(purchased.line_total),
                    purchased.quantity,
                    from_minor_units(purchased.unit_amount)
                ));
            }

            let (product_id, name) = match resolved {
                Some((id, name)) => (Some(id), name),
                None => {
                    let name = if purchased.description.is_empty() {
                        "Unknown item".to_string()
                    } else {
                        purchased.description
                    };
                    notes.push(format!("line item '{}' matches no product", name));
                    (None, name)
                }
            };

            items.push(NewOrderItem {
                product_id,
                name,
                quantity,
                price: from_minor_units(purchased.unit_amount),
            });
        }

        if items.is_empty() {
            notes.push("session has no line items".to_string());
        }

        let metadata = checkout.metadata;
        let shipping_name = metadata
            .get(METADATA_SHIPPING_NAME)
            .cloned()
            .or_else(|| buyer.name.clone())
            .unwrap_or_default();
        let shipping_email = metadata
            .get(METADATA_SHIPPING_EMAIL)
            .cloned()
            .unwrap_or_else(|| buyer.email.clone());
        let shipping_address = match metadata.get(METADATA_SHIPPING_ADDRESS) {
            Some(address) => address.clone(),
            None => {
                notes.push("session metadata has no shipping address".to_string());
                String::new()
            }
        };

        let mut order = NewOrder {
            user_id: buyer.id,
            status: if checkout.paid {
                OrderStatus::Processing
            } else {
                OrderStatus::Pending
            },
            total: Default::default(),
            shipping_name,
            shipping_email,
            shipping_address,
            payment_reference: Some(checkout.session_id),
            payment_intent_id: checkout.payment_intent_id,
            requires_review: false,
            review_note: None,
            items,
        };

        let items_total = order.items_total();
        order.total = match checkout.amount_total {
            Some(charged) => from_minor_units(charged),
            None => {
                notes.push("processor reported no amount total".to_string());
                items_total
            }
        };
        if items_total != order.total {
            notes.push(format!(
                "line items sum to {} but {} was charged",
                items_total, order.total
            ));
        }

        for note in notes {
            order.flag_for_review(note);
        }
        Ok(order)
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentConfirmationService for PaymentConfirmation<U> {
    async fn handle_webhook(&self, payload: &str, signature: &str) -> AppResult<WebhookOutcome> {
        match self.gateway.verify_event(payload, signature)? {
            PaymentEvent::CheckoutCompleted { session_id } => {
                tracing::info!(session_id = %session_id, "Checkout completed event received");
                self.settle(&session_id).await
            }
            PaymentEvent::AsyncPaymentSucceeded { session_id } => {
                tracing::info!(session_id = %session_id, "Delayed payment succeeded");
                self.resolve_delayed_payment(&session_id, OrderStatus::Processing)
                    .await
            }
            PaymentEvent::AsyncPaymentFailed { session_id } => {
                tracing::info!(session_id = %session_id, "Delayed payment failed");
                self.resolve_delayed_payment(&session_id, OrderStatus::Cancelled)
                    .await
            }
            PaymentEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Ignoring webhook event");
                Ok(WebhookOutcome::Ignored { event_type })
            }
        }
    }
}

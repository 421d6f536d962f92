//! Payment processor boundary.
//!
//! Services talk to [`PaymentGateway`]; the Stripe-backed implementation
//! lives in [`stripe_gateway`]. All amounts crossing this boundary are in
//! minor currency units.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

mod stripe_gateway;

pub use stripe_gateway::StripeGateway;

/// One line of a hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLineItem {
    /// Internal product id, carried in the processor's product metadata
    pub product_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub unit_amount: i64,
    pub quantity: u64,
}

/// Everything the processor needs to open a hosted checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionRequest {
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub line_items: Vec<CheckoutLineItem>,
    pub metadata: HashMap<String, String>,
}

/// Handle on a created session: the id plus the page the customer is sent to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedCheckout {
    pub session_id: String,
    pub url: String,
}

/// A verified webhook delivery, reduced to what the storefront acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    CheckoutCompleted { session_id: String },
    /// A delayed payment method (bank debit, voucher) cleared after checkout
    AsyncPaymentSucceeded { session_id: String },
    /// A delayed payment method failed; the session will never be paid
    AsyncPaymentFailed { session_id: String },
    Other { event_type: String },
}

/// Line item as charged, read back from the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedItem {
    /// `None` when the line carried no parseable product id
    pub product_id: Option<Uuid>,
    pub description: String,
    pub quantity: u64,
    pub unit_amount: i64,
    /// What the processor charged for the whole line
    pub line_total: i64,
}

impl PurchasedItem {
    /// Whether `unit_amount × quantity` accounts for the charged line total
    pub fn is_exact(&self) -> bool {
        self.unit_amount.checked_mul(self.quantity as i64) == Some(self.line_total)
    }
}

/// Full view of a completed checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    /// What was actually charged; absent only on malformed sessions
    pub amount_total: Option<i64>,
    pub paid: bool,
    pub metadata: HashMap<String, String>,
    pub line_items: Vec<PurchasedItem>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session.
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> AppResult<HostedCheckout>;

    /// Check the signature over the raw body and decode the event.
    ///
    /// Fails with `WebhookSignature` when the payload was not signed with
    /// the configured secret.
    fn verify_event(&self, payload: &str, signature: &str) -> AppResult<PaymentEvent>;

    /// Re-read a session with its line items and their product metadata.
    async fn fetch_completed_checkout(&self, session_id: &str) -> AppResult<CompletedCheckout>;
}

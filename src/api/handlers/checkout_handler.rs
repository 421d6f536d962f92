//! Hosted checkout and the payment processor's webhook.

use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::post,
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::STRIPE_SIGNATURE_HEADER;
use crate::domain::Actor;
use crate::errors::{AppError, AppResult};
use crate::services::{ShippingDetails, WebhookOutcome};
use crate::types::WebhookAck;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "Shipping name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub shipping_name: String,
    #[validate(email(message = "Invalid shipping email"))]
    #[schema(example = "ada@example.com")]
    pub shipping_email: String,
    #[validate(length(min = 1, message = "Shipping address is required"))]
    #[schema(example = "12 St James's Square, London")]
    pub shipping_address: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    #[schema(example = "cs_test_a1b2c3")]
    pub session_id: String,
    /// Hosted payment page to redirect the customer to
    pub url: String,
}

pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/session", post(create_session))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(stripe_webhook))
}

/// Start a hosted checkout for the current cart
#[utoipa::path(
    post,
    path = "/checkout/session",
    tag = "Checkout",
    security(("bearer_auth" = [])),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Session created", body = CheckoutSessionResponse),
        (status = 400, description = "Empty cart or invalid shipping details"),
        (status = 502, description = "Payment processor unavailable")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<CheckoutRequest>,
) -> AppResult<Json<CheckoutSessionResponse>> {
    let shipping = ShippingDetails {
        name: payload.shipping_name,
        email: payload.shipping_email,
        address: payload.shipping_address,
    };
    let session = state
        .services
        .checkout()
        .create_session(&actor, shipping)
        .await?;

    Ok(Json(CheckoutSessionResponse {
        session_id: session.session_id,
        url: session.url,
    }))
}

/// Payment processor events.
///
/// The body is taken raw since the signature covers the exact bytes. Only
/// failures worth a redelivery answer 5xx; everything else is acknowledged.
#[utoipa::path(
    post,
    path = "/webhooks/stripe",
    tag = "Checkout",
    request_body(content = String, description = "Raw event payload", content_type = "application/json"),
    params(("Stripe-Signature" = String, Header, description = "Event signature")),
    responses(
        (status = 200, description = "Event accepted", body = WebhookAck),
        (status = 400, description = "Missing or invalid signature"),
        (status = 500, description = "Temporary failure, redeliver")
    )
)]
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: String,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::WebhookSignature("missing signature header".to_string()))?;

    match state
        .services
        .payments()
        .handle_webhook(&payload, signature)
        .await
    {
        Ok(outcome) => {
            log_outcome(&outcome);
            Ok(Json(WebhookAck::received()))
        }
        Err(err @ AppError::WebhookSignature(_)) => Err(err),
        Err(err) if err.is_retryable() => {
            tracing::error!(error = %err, "Webhook processing failed, asking for redelivery");
            Err(err)
        }
        Err(err) => {
            tracing::error!(error = %err, "Webhook processing failed permanently, acknowledging");
            Ok(Json(WebhookAck::received()))
        }
    }
}

fn log_outcome(outcome: &WebhookOutcome) {
    match outcome {
        WebhookOutcome::Ignored { event_type } => {
            tracing::debug!(%event_type, "Webhook event ignored");
        }
        WebhookOutcome::Settled {
            order_id,
            requires_review,
        } => {
            tracing::info!(%order_id, requires_review, "Order settled from webhook");
        }
        WebhookOutcome::AlreadySettled { order_id } => {
            tracing::info!(%order_id, "Redelivered webhook, order already exists");
        }
        WebhookOutcome::PaymentResolved { order_id, status } => {
            tracing::info!(%order_id, %status, "Delayed payment resolved");
        }
        WebhookOutcome::Unreconcilable { session_id, reason } => {
            tracing::error!(%session_id, %reason, "Paid checkout could not be turned into an order");
        }
    }
}

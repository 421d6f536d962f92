//! Stripe implementation of the payment gateway (async-stripe).

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency, EventObject, EventType, Webhook,
};
use uuid::Uuid;

use super::{
    CheckoutSessionRequest, CompletedCheckout, HostedCheckout, PaymentEvent, PaymentGateway,
    PurchasedItem,
};
use crate::config::{MAX_CHECKOUT_IMAGES, METADATA_PRODUCT_ID};
use crate::errors::{AppError, AppResult};

/// Expansion needed to read product metadata off each listed line item
const LINE_ITEM_EXPAND: &[&str] = &["data.price.product"];

/// Largest page the line item listing accepts
const LINE_ITEMS_PAGE_SIZE: u64 = 100;

pub struct StripeGateway {
    client: Client,
    webhook_secret: String,
}

impl StripeGateway {
    pub fn new(secret_key: &str, webhook_secret: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret: webhook_secret.to_string(),
        }
    }
}

fn parse_currency(code: &str) -> AppResult<Currency> {
    serde_json::from_value(serde_json::Value::String(code.to_lowercase()))
        .map_err(|_| AppError::internal(format!("Unsupported checkout currency: {}", code)))
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: CheckoutSessionRequest,
    ) -> AppResult<HostedCheckout> {
        let currency = parse_currency(&request.currency)?;

        let line_items = request
            .line_items
            .into_iter()
            .map(|item| CreateCheckoutSessionLineItems {
                price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                    currency,
                    product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                        name: item.name,
                        description: item.description.filter(|d| !d.trim().is_empty()),
                        images: Some(
                            item.images.into_iter().take(MAX_CHECKOUT_IMAGES).collect(),
                        ),
                        metadata: Some(HashMap::from([(
                            METADATA_PRODUCT_ID.to_string(),
                            item.product_id.to_string(),
                        )])),
                        ..Default::default()
                    }),
                    unit_amount: Some(item.unit_amount),
                    ..Default::default()
                }),
                quantity: Some(item.quantity),
                ..Default::default()
            })
            .collect();

        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Payment);
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.customer_email = request.customer_email.as_deref();
        params.line_items = Some(line_items);
        params.metadata = Some(request.metadata);

        let session = CheckoutSession::create(&self.client, params).await?;
        let url = session
            .url
            .ok_or_else(|| AppError::payment_provider("Checkout session has no hosted URL"))?;

        Ok(HostedCheckout {
            session_id: session.id.to_string(),
            url,
        })
    }

    fn verify_event(&self, payload: &str, signature: &str) -> AppResult<PaymentEvent> {
        let event = Webhook::construct_event(payload, signature, &self.webhook_secret)
            .map_err(|e| AppError::WebhookSignature(e.to_string()))?;

        let event_type = event.type_;
        let session_id = match event.data.object {
            EventObject::CheckoutSession(session) => session.id.to_string(),
            _ => {
                return Ok(PaymentEvent::Other {
                    event_type: event_type.to_string(),
                })
            }
        };

        Ok(match event_type {
            EventType::CheckoutSessionCompleted => PaymentEvent::CheckoutCompleted { session_id },
            EventType::CheckoutSessionAsyncPaymentSucceeded => {
                PaymentEvent::AsyncPaymentSucceeded { session_id }
            }
            EventType::CheckoutSessionAsyncPaymentFailed => {
                PaymentEvent::AsyncPaymentFailed { session_id }
            }
            other => PaymentEvent::Other {
                event_type: other.to_string(),
            },
        })
    }

    async fn fetch_completed_checkout(&self, session_id: &str) -> AppResult<CompletedCheckout> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid session id: {}", session_id)))?;

        let session = CheckoutSession::retrieve(&self.client, &id, &[]).await?;

        let paid = matches!(
            session.payment_status,
            CheckoutSessionPaymentStatus::Paid | CheckoutSessionPaymentStatus::NoPaymentRequired
        );
        let payment_intent_id = session.payment_intent.as_ref().map(|pi| pi.id().to_string());

        let view: SessionView = serde_json::to_value(&session)
            .and_then(serde_json::from_value)
            .map_err(|e| AppError::internal(format!("Unreadable checkout session: {}", e)))?;

        let path = format!("/checkout/sessions/{}/line_items", id);
        let line_items = collect_line_items(|cursor| {
            let page = self.client.get_query::<ListView, _>(
                &path,
                LineItemsPage {
                    limit: LINE_ITEMS_PAGE_SIZE,
                    starting_after: cursor.as_deref(),
                    expand: LINE_ITEM_EXPAND,
                },
            );
            async move { page.await.map_err(AppError::from) }
        })
        .await?;

        Ok(CompletedCheckout {
            session_id: session.id.to_string(),
            payment_intent_id,
            amount_total: session.amount_total,
            paid,
            metadata: view.metadata.unwrap_or_default(),
            line_items,
        })
    }
}

/// Read every page of a session's line items, following `starting_after`
/// from the last item of each page until the processor reports no more.
async fn collect_line_items<F, Fut>(mut fetch_page: F) -> AppResult<Vec<PurchasedItem>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = AppResult<ListView>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    loop {
        let page = fetch_page(cursor.take()).await?;
        let last_id = page.data.last().and_then(|item| item.id.clone());
        items.extend(page.data.into_iter().map(PurchasedItem::from));

        if !page.has_more {
            return Ok(items);
        }
        match last_id {
            Some(id) => cursor = Some(id),
            None => {
                return Err(AppError::payment_provider(
                    "Line item listing has more pages but no cursor",
                ))
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct LineItemsPage<'a> {
    limit: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    starting_after: Option<&'a str>,
    expand: &'a [&'a str],
}

// Projections of the session and line item JSON. Only the fields read here
// are declared, each optional, so an absent or null field never fails the read.

#[derive(Debug, Deserialize)]
struct SessionView {
    metadata: Option<HashMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct ListView {
    #[serde(default)]
    data: Vec<LineItemView>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct LineItemView {
    id: Option<String>,
    description: Option<String>,
    quantity: Option<u64>,
    amount_total: Option<i64>,
    price: Option<PriceView>,
}

#[derive(Debug, Deserialize)]
struct PriceView {
    unit_amount: Option<i64>,
    product: Option<ProductView>,
}

/// `price.product` is either a bare id or, when expanded, the product object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProductView {
    Expanded {
        name: Option<String>,
        metadata: Option<HashMap<String, String>>,
    },
    Id(String),
}

impl From<LineItemView> for PurchasedItem {
    fn from(item: LineItemView) -> Self {
        let quantity = item.quantity.unwrap_or(1);
        let (unit_amount, product) = match item.price {
            Some(price) => (price.unit_amount, price.product),
            None => (None, None),
        };
        let line_total = item
            .amount_total
            .or_else(|| unit_amount.map(|unit| unit * quantity as i64))
            .unwrap_or(0);
        // Without a unit price the line total is spread evenly; a remainder
        // leaves the item inexact and the order is flagged downstream.
        let unit_amount = unit_amount.unwrap_or(line_total / quantity.max(1) as i64);

        let (product_name, product_id) = match product {
            Some(ProductView::Expanded { name, metadata }) => {
                let id = metadata
                    .as_ref()
                    .and_then(|m| m.get(METADATA_PRODUCT_ID))
                    .and_then(|raw| Uuid::parse_str(raw).ok());
                (name, id)
            }
            Some(ProductView::Id(_)) | None => (None, None),
        };

        PurchasedItem {
            product_id,
            description: item
                .description
                .filter(|d| !d.is_empty())
                .or(product_name)
                .unwrap_or_default(),
            quantity,
            unit_amount,
            line_total,
        }
    }
}

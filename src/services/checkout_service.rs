//! Turns the caller's cart into a hosted checkout session.
//!
//! Reads the cart and the products behind it and nothing else: prices and
//! quantities always come from the server side. Creating a session never
//! writes to the cart or the orders.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{
    Config, CHECKOUT_CANCEL_PATH, CHECKOUT_SUCCESS_PATH, MAX_METADATA_VALUE_LENGTH,
    METADATA_SHIPPING_ADDRESS, METADATA_SHIPPING_EMAIL, METADATA_SHIPPING_NAME, METADATA_USER_ID,
};
use crate::domain::money::to_minor_units;
use crate::domain::{Actor, CartLine};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    CheckoutLineItem, CheckoutSessionRequest, HostedCheckout, PaymentGateway, UnitOfWork,
};

/// Where the order ships, captured at checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    pub name: String,
    pub email: String,
    pub address: String,
}

#[async_trait]
pub trait CheckoutService: Send + Sync {
    async fn create_session(
        &self,
        actor: &Actor,
        shipping: ShippingDetails,
    ) -> AppResult<HostedCheckout>;
}

pub struct CheckoutManager<U: UnitOfWork> {
    uow: Arc<U>,
    gateway: Arc<dyn PaymentGateway>,
    config: Config,
}

impl<U: UnitOfWork> CheckoutManager<U> {
    pub fn new(uow: Arc<U>, gateway: Arc<dyn PaymentGateway>, config: Config) -> Self {
        Self {
            uow,
            gateway,
            config,
        }
    }

    fn build_request(
        &self,
        actor: &Actor,
        shipping: ShippingDetails,
        lines: Vec<CartLine>,
    ) -> AppResult<CheckoutSessionRequest> {
        let line_items = lines
            .into_iter()
            .map(|line| {
                let quantity = u64::try_from(line.quantity)
                    .map_err(|_| AppError::internal("Cart line with negative quantity"))?;
                Ok(CheckoutLineItem {
                    product_id: line.product.id,
                    unit_amount: to_minor_units(line.product.price)?,
                    quantity,
                    name: line.product.name,
                    description: Some(line.product.description),
                    images: line.product.images,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let metadata = HashMap::from([
            (METADATA_USER_ID.to_string(), actor.id.to_string()),
            (METADATA_SHIPPING_NAME.to_string(), shipping.name),
            (METADATA_SHIPPING_EMAIL.to_string(), shipping.email.clone()),
            (METADATA_SHIPPING_ADDRESS.to_string(), shipping.address),
        ]);
        if let Some((key, _)) = metadata
            .iter()
            .find(|(_, value)| value.chars().count() as u64 > MAX_METADATA_VALUE_LENGTH)
        {
            return Err(AppError::validation(format!(
                "{} must be at most {} characters",
                key, MAX_METADATA_VALUE_LENGTH
            )));
        }

        let base = self.config.storefront_url.trim_end_matches('/');
        Ok(CheckoutSessionRequest {
            currency: self.config.checkout_currency.clone(),
            success_url: format!("{}{}", base, CHECKOUT_SUCCESS_PATH),
            cancel_url: format!("{}{}", base, CHECKOUT_CANCEL_PATH),
            customer_email: Some(shipping.email),
            line_items,
            metadata,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> CheckoutService for CheckoutManager<U> {
    async fn create_session(
        &self,
        actor: &Actor,
        shipping: ShippingDetails,
    ) -> AppResult<HostedCheckout> {
        let lines = self.uow.carts().lines(actor.id).await?;
        if lines.is_empty() {
            return Err(AppError::validation("Cart is empty"));
        }

        let request = self.build_request(actor, shipping, lines)?;
        let line_count = request.line_items.len();
        let session = self.gateway.create_checkout_session(request).await?;

        tracing::info!(
            user_id = %actor.id,
            session_id = %session.session_id,
            line_count,
            "Checkout session created"
        );
        Ok(session)
    }
}

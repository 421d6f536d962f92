//! Product domain entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Wireless Headphones")]
    pub name: String,
    pub description: String,
    #[schema(value_type = f64, example = 59.99)]
    pub price: Decimal,
    #[schema(example = 25)]
    pub stock: i32,
    pub images: Vec<String>,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to persist a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub images: Vec<String>,
    pub category_id: Uuid,
}

impl NewProduct {
    /// Enforce non-negative price and stock.
    pub fn validate(&self) -> AppResult<()> {
        validate_price(self.price)?;
        validate_stock(self.stock)
    }
}

/// Partial product update
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub images: Option<Vec<String>>,
    pub category_id: Option<Uuid>,
}

impl ProductChanges {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(AppError::validation("Price must not be negative"));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> AppResult<()> {
    if stock < 0 {
        return Err(AppError::validation("Stock must not be negative"));
    }
    Ok(())
}

//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_CHECKOUT_CURRENCY, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_STOREFRONT_URL, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    stripe_secret_key: String,
    stripe_webhook_secret: String,
    pub checkout_currency: String,
    pub storefront_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("stripe_secret_key", &"[REDACTED]")
            .field("stripe_webhook_secret", &"[REDACTED]")
            .field("checkout_currency", &self.checkout_currency)
            .field("storefront_url", &self.storefront_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short, or if the Stripe
    /// secrets are missing in a release build.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = required_secret("JWT_SECRET", "dev-secret-key-minimum-32-chars!!");

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            stripe_secret_key: required_secret("STRIPE_SECRET_KEY", "sk_test_development"),
            stripe_webhook_secret: required_secret(
                "STRIPE_WEBHOOK_SECRET",
                "whsec_development",
            ),
            checkout_currency: env::var("CHECKOUT_CURRENCY")
                .map(|c| c.to_lowercase())
                .unwrap_or_else(|_| DEFAULT_CHECKOUT_CURRENCY.to_string()),
            storefront_url: env::var("STOREFRONT_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_STOREFRONT_URL.to_string()),
        }
    }

    /// Build a configuration from explicit secrets (tests and tooling).
    pub fn with_secrets(
        jwt_secret: impl Into<String>,
        stripe_secret_key: impl Into<String>,
        stripe_webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            stripe_secret_key: stripe_secret_key.into(),
            stripe_webhook_secret: stripe_webhook_secret.into(),
            checkout_currency: DEFAULT_CHECKOUT_CURRENCY.to_string(),
            storefront_url: DEFAULT_STOREFRONT_URL.to_string(),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Secret API key for the payment processor.
    pub fn stripe_secret_key(&self) -> &str {
        &self.stripe_secret_key
    }

    /// Shared secret used to verify webhook signatures.
    pub fn stripe_webhook_secret(&self) -> &str {
        &self.stripe_webhook_secret
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read a secret, falling back to an insecure default only in debug builds.
fn required_secret(name: &str, dev_default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("{} not set, using insecure default for development", name);
            dev_default.to_string()
        } else {
            panic!("{} environment variable must be set in production", name);
        }
    })
}

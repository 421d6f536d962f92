//! Shared handler state.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Pinged by `/health`; absent when the services run over in-memory repositories
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Production state: PostgreSQL-backed services and the Stripe gateway.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self {
            services: Arc::new(services),
            database: Some(database),
        }
    }

    /// State over an arbitrary service container, without a database to ping.
    pub fn new(services: Arc<dyn ServiceContainer>) -> Self {
        Self {
            services,
            database: None,
        }
    }
}

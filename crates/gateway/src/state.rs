//! Application state - Dependency injection container.

use std::sync::Arc;

use jsonwebtoken::DecodingKey;

use payment_service_lib::infra::Database;
use payment_service_lib::service::{ServiceContainer, Services};

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Key for verifying upstream identity tokens
    pub jwt_key: Arc<DecodingKey>,
    /// Database handle, used by the health check
    pub database: Database,
}

impl AppState {
    /// Create application state from a connected database and config.
    pub fn from_config(database: Database, config: &GatewayConfig) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            &config.payments,
        ));
        Self::new(services, config.jwt.secret.as_bytes(), database)
    }

    /// Create application state with manually injected services.
    pub fn new(services: Arc<dyn ServiceContainer>, jwt_secret: &[u8], database: Database) -> Self {
        Self {
            services,
            jwt_key: Arc::new(DecodingKey::from_secret(jwt_secret)),
            database,
        }
    }
}

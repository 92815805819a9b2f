//! Gateway configuration.

use std::env;

use common::{AppResult, DatabaseConfig, JwtConfig, ServiceConfig};
use payment_service_lib::config::PaymentServiceConfig;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub service: ServiceConfig,
    pub jwt: JwtConfig,
    pub payments: PaymentServiceConfig,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let defaults = ServiceConfig::default();
        let service = ServiceConfig {
            service_name: env::var("GATEWAY_SERVICE_NAME").unwrap_or(defaults.service_name),
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        };

        Ok(Self {
            service,
            jwt: JwtConfig::from_env()?,
            payments: PaymentServiceConfig::from_env(),
            cors_origins: parse_origins(&env::var("GATEWAY_CORS_ORIGINS").unwrap_or_default()),
        })
    }

    pub fn database(&self) -> &DatabaseConfig {
        &self.payments.database
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

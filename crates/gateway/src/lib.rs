//! API Gateway Library
//!
//! HTTP REST API for payment review and subscription activation. The payment
//! services run in-process behind the `ServiceContainer`.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use payment_service_lib::infra::Database;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Router with the HTTP layers applied.
pub fn build_app(state: AppState, config: &GatewayConfig) -> Router {
    create_router(state)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server with the given configuration.
pub async fn serve(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize database (applies pending migrations)
    let database = Database::connect(config.database()).await?;

    let state = AppState::from_config(database, &config);
    let app = build_app(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    info!(
        service = %config.service.service_name,
        approval_mode = ?config.payments.approval_mode,
        "Gateway listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

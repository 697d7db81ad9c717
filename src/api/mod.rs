//! HTTP API
//!
//! Thin axum layer over `TradingService`: parse the body, call the service,
//! shape the response.

mod error;
mod handlers;
mod types;

pub use error::ApiError;
pub use types::{
    AssetBody, BalanceRequest, BatchResponse, BuyRequest, SellRequest, TradeItem, TradeResultBody,
};

use crate::config::ServerConfig;
use crate::service::TradingService;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn create_router(service: Arc<TradingService>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/balance", post(handlers::balance))
        .route("/sellable_assets", post(handlers::sellable_assets))
        .route("/sell", post(handlers::sell))
        .route("/buy", post(handlers::buy))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// CORS for the configured origins, with credentials
///
/// Credentialed CORS cannot use the `*` wildcard, so it is dropped along
/// with any origin that is not a valid header value.
fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(origins)))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| {
            if origin.trim() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin, credentials require explicit origins");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect()
}

/// Serve until ctrl-c
pub async fn serve(service: Arc<TradingService>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router(service, config);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;

    tracing::info!(addr = %listener.local_addr()?, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    Ok(())
}

//! Router wiring for the integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use minance::api::create_router;
use minance::config::{ServerConfig, TradingConfig};
use minance::exchange::testing::FakeExchange;
use minance::pricing::testing::StaticPriceSource;
use minance::service::TradingService;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn app(exchange: &FakeExchange, fallback: StaticPriceSource) -> Router {
    let service = TradingService::new(
        Arc::new(exchange.clone()),
        Arc::new(fallback),
        "USDT",
        &TradingConfig::default(),
    );
    create_router(Arc::new(service), &ServerConfig::default())
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

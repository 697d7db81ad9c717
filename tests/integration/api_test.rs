//! HTTP API tests

use crate::support::{app, post_json};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use minance::exchange::testing::FakeExchange;
use minance::exchange::{Fill, Side};
use minance::pricing::testing::StaticPriceSource;
use rust_decimal_macros::dec;
use serde_json::json;
use tower::ServiceExt;

fn portfolio() -> FakeExchange {
    FakeExchange::new()
        .with_holding("USDT", dec!(250), dec!(0))
        .with_holding("ETH", dec!(1.2345), dec!(0))
        .with_holding("DOGE", dec!(12), dec!(0))
        .with_holding("PEPE", dec!(0), dec!(0))
        .with_price("ETHUSDT", dec!(3000))
        .with_price("DOGEUSDT", dec!(0.25))
        .with_standard_filters("ETHUSDT", dec!(0.0001), dec!(5))
        .with_standard_filters("DOGEUSDT", dec!(1), dec!(1))
        .with_fills("ETHUSDT", vec![Fill::new(dec!(1.2345), dec!(3000))])
        .with_fills("DOGEUSDT", vec![Fill::new(dec!(123), dec!(0.25))])
}

fn credentials() -> serde_json::Value {
    json!({"api_key": "key", "api_secret": "secret"})
}

#[tokio::test]
async fn test_health() {
    let app = app(&FakeExchange::new(), StaticPriceSource::default());
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_balance_lists_valued_holdings() {
    let app = app(&portfolio(), StaticPriceSource::default());

    let (status, body) = post_json(app, "/balance", credentials()).await;

    assert_eq!(status, StatusCode::OK);
    let assets = body.as_array().unwrap();
    let symbols: Vec<_> = assets.iter().map(|a| a["symbol"].as_str().unwrap()).collect();
    assert_eq!(symbols, vec!["USDT", "ETH", "DOGE"]);
    assert_eq!(assets[0]["price"], json!(1.0));
    assert_eq!(assets[0]["value_usdt"], json!(250.0));
    assert_eq!(assets[1]["value_usdt"], json!(3703.5));
}

#[tokio::test]
async fn test_sellable_assets_applies_threshold() {
    let exchange = portfolio().with_holding("SOLV", dec!(1000), dec!(0));
    let fallback = StaticPriceSource::new(&[("SOLV", dec!(0.03))]);
    let app = app(&exchange, fallback);

    let (status, body) = post_json(app, "/sellable_assets", credentials()).await;

    assert_eq!(status, StatusCode::OK);
    let symbols: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["symbol"].as_str().unwrap().to_string())
        .collect();
    // DOGE is worth 3 USDT, below the default minimum of 5
    assert_eq!(symbols, vec!["ETH", "SOLV"]);
}

#[tokio::test]
async fn test_sell_reports_received_quote() {
    let exchange = portfolio();
    let app = app(&exchange, StaticPriceSource::default());

    let (status, body) = post_json(
        app,
        "/sell",
        json!({
            "api_key": "key",
            "api_secret": "secret",
            "sell": [
                {"symbol": "USDT", "amount": 10},
                {"symbol": "ETH", "amount": 1.2345}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["symbol"], json!("ETH"));
    assert_eq!(results[0]["usdt_received"], json!(3703.5));
    assert_eq!(results[0]["actual_price"], json!(3000.0));
    assert!(results[0].get("usdt_spent").is_none());
    assert!(results[0].get("error").is_none());
    assert!(results[0]["timestamp"].as_i64().unwrap() > 0);

    assert_eq!(
        exchange.orders(),
        vec![("ETHUSDT".to_string(), Side::Sell, dec!(1.2345))]
    );
}

#[tokio::test]
async fn test_buy_floors_cheap_assets_and_reports_failures() {
    let exchange = portfolio();
    let app = app(&exchange, StaticPriceSource::default());

    let (status, body) = post_json(
        app,
        "/buy",
        json!({
            "api_key": "key",
            "api_secret": "secret",
            "buy": [
                {"symbol": "DOGE", "amount": 123.7},
                {"symbol": "NOPE", "amount": 0.5}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1, "unpriced NOPE floors to zero and is skipped");
    assert_eq!(results[0]["amount"], json!(123.0));
    assert_eq!(results[0]["usdt_spent"], json!(30.75));
    assert!(results[0].get("usdt_received").is_none());

    assert_eq!(
        exchange.orders(),
        vec![("DOGEUSDT".to_string(), Side::Buy, dec!(123))]
    );
}

#[tokio::test]
async fn test_untradable_symbol_is_item_error() {
    let exchange = portfolio().with_price("LUNCUSDT", dec!(2));
    let app = app(&exchange, StaticPriceSource::default());

    let (status, body) = post_json(
        app,
        "/sell",
        json!({
            "api_key": "key",
            "api_secret": "secret",
            "sell": [{"symbol": "LUNC", "amount": 5}, {"symbol": "ETH", "amount": 1.2345}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0]["error"]
        .as_str()
        .unwrap()
        .starts_with("Required filter (LOT_SIZE or MIN_NOTIONAL) not found"));
    assert_eq!(results[0]["usdt_received"], json!(0.0));
    assert!(results[1].get("error").is_none());
}

#[tokio::test]
async fn test_rejected_credentials_return_detail() {
    let exchange = portfolio().with_account_error(
        -2015,
        "Invalid API-key, IP, or permissions for action.",
    );
    let app = app(&exchange, StaticPriceSource::default());

    let (status, body) = post_json(
        app,
        "/sell",
        json!({
            "api_key": "bad",
            "api_secret": "secret",
            "sell": [{"symbol": "ETH", "amount": 1}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "APIError(code=-2015): Invalid API-key, IP, or permissions for action."})
    );
    assert!(exchange.orders().is_empty());
    assert_eq!(exchange.connected_keys(), vec!["bad"]);
}

#[tokio::test]
async fn test_cors_preflight_for_frontend_origin() {
    let app = app(&FakeExchange::new(), StaticPriceSource::default());
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/sell")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers["access-control-allow-origin"],
        "http://localhost:3000"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-allow-methods"], "POST");
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let app = app(&FakeExchange::new(), StaticPriceSource::default());
    let request = Request::builder()
        .uri("/health")
        .header("origin", "https://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

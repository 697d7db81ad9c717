//! HTTP request and response bodies
//!
//! Field names follow the contract the web frontend already consumes, and
//! amounts are sent as JSON numbers.

use crate::exchange::{Credentials, Side};
use crate::service::AssetValuation;
use crate::trading::{TradeRequest, TradeResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of `/balance` and `/sellable_assets`
#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub api_key: String,
    pub api_secret: String,
}

impl BalanceRequest {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api_key, &self.api_secret)
    }
}

/// One requested trade
#[derive(Debug, Deserialize)]
pub struct TradeItem {
    pub symbol: String,
    pub amount: Decimal,
}

/// Body of `/sell`
#[derive(Debug, Deserialize)]
pub struct SellRequest {
    pub api_key: String,
    pub api_secret: String,
    pub sell: Vec<TradeItem>,
}

/// Body of `/buy`
#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub api_key: String,
    pub api_secret: String,
    pub buy: Vec<TradeItem>,
}

/// A batch order request with its side resolved
pub struct BatchRequest {
    pub credentials: Credentials,
    pub side: Side,
    pub requests: Vec<TradeRequest>,
}

fn trade_requests(items: Vec<TradeItem>) -> Vec<TradeRequest> {
    items
        .into_iter()
        .map(|item| TradeRequest::new(item.symbol, item.amount))
        .collect()
}

impl From<SellRequest> for BatchRequest {
    fn from(body: SellRequest) -> Self {
        Self {
            credentials: Credentials::new(body.api_key, body.api_secret),
            side: Side::Sell,
            requests: trade_requests(body.sell),
        }
    }
}

impl From<BuyRequest> for BatchRequest {
    fn from(body: BuyRequest) -> Self {
        Self {
            credentials: Credentials::new(body.api_key, body.api_secret),
            side: Side::Buy,
            requests: trade_requests(body.buy),
        }
    }
}

/// A valued holding
#[derive(Debug, Serialize)]
pub struct AssetBody {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub value_usdt: Decimal,
}

impl From<AssetValuation> for AssetBody {
    fn from(asset: AssetValuation) -> Self {
        Self {
            symbol: asset.symbol,
            amount: asset.amount,
            price: asset.price,
            value_usdt: asset.value,
        }
    }
}

/// One trade outcome; exactly one of `usdt_received` / `usdt_spent` is set
#[derive(Debug, Serialize)]
pub struct TradeResultBody {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_price: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub usdt_received: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub usdt_spent: Option<Decimal>,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TradeResult> for TradeResultBody {
    fn from(result: TradeResult) -> Self {
        let (usdt_received, usdt_spent) = match result.side {
            Side::Sell => (Some(result.quote_amount), None),
            Side::Buy => (None, Some(result.quote_amount)),
        };

        Self {
            symbol: result.symbol,
            amount: result.amount,
            price: result.price,
            actual_price: result.realized_price,
            usdt_received,
            usdt_spent,
            timestamp: result.timestamp.timestamp(),
            error: result.error,
        }
    }
}

/// Body returned by `/sell` and `/buy`
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<TradeResultBody>,
}

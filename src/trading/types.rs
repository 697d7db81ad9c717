//! Trading pipeline types

use crate::exchange::{ExchangeError, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One requested trade of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Base asset ticker, e.g. "BTC"
    pub symbol: String,
    /// Base-asset quantity the caller asked for
    pub requested_amount: Decimal,
}

impl TradeRequest {
    pub fn new(symbol: impl Into<String>, requested_amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            requested_amount,
        }
    }
}

/// Outcome of one processed trade request
///
/// Created once and never modified; a populated `error` with zero realized
/// amounts means the order was not placed or failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeResult {
    pub symbol: String,
    pub side: Side,
    pub requested_amount: Decimal,
    /// Quantity after normalization, the one submitted to the exchange
    pub amount: Decimal,
    /// Price the quantity was sized and validated against
    pub price: Decimal,
    /// Volume-weighted fill price
    pub realized_price: Decimal,
    /// Sum of filled base quantity
    pub realized_quantity: Decimal,
    /// Quote currency received (sell) or spent (buy)
    pub quote_amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
}

impl TradeResult {
    /// Result for an item that produced no fills
    pub fn failed(
        request: &TradeRequest,
        side: Side,
        amount: Decimal,
        price: Decimal,
        error: impl Into<String>,
    ) -> Self {
        Self {
            symbol: request.symbol.clone(),
            side,
            requested_amount: request.requested_amount,
            amount,
            price,
            realized_price: Decimal::ZERO,
            realized_quantity: Decimal::ZERO,
            quote_amount: Decimal::ZERO,
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Item-level failures; recorded on the item's result, never propagated
#[derive(Debug, Error)]
pub enum TradeError {
    /// Lot-size or notional filter missing for the pair
    #[error("Required filter (LOT_SIZE or MIN_NOTIONAL) not found for this symbol. It may be delisted, not tradable for {quote}, or have special trading rules.")]
    FilterUnavailable { pair: String, quote: String },
    /// Quantity or notional value under the exchange minimum
    #[error("Amount {quantity} is below minQty {min_quantity} or notional {trade_value} < minNotional {min_notional}")]
    BelowMinimum {
        quantity: Decimal,
        min_quantity: Decimal,
        trade_value: Decimal,
        min_notional: Decimal,
    },
    /// Filter lookup or order submission failed
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

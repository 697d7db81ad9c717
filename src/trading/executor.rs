//! Market order submission and fill reconciliation

use crate::exchange::{ExchangeApi, ExchangeError, Fill, Side};
use crate::telemetry::{self, CounterMetric, LatencyMetric};
use rust_decimal::Decimal;
use std::time::Instant;

/// What a market order actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Quote currency received or spent
    pub quote_amount: Decimal,
    /// Base quantity filled
    pub quantity: Decimal,
    /// Volume-weighted fill price
    pub price: Decimal,
}

impl Execution {
    /// Aggregate fills; with nothing filled the price falls back to `quoted_price`
    pub fn from_fills(fills: &[Fill], quoted_price: Decimal) -> Self {
        let quote_amount: Decimal = fills.iter().map(|f| f.qty * f.price).sum();
        let quantity: Decimal = fills.iter().map(|f| f.qty).sum();
        let price = if quantity > Decimal::ZERO {
            quote_amount / quantity
        } else {
            quoted_price
        };

        Self {
            quote_amount,
            quantity,
            price,
        }
    }

    /// Acknowledged order that moved no quote currency
    pub fn is_empty(&self) -> bool {
        self.quote_amount.is_zero()
    }
}

/// Warning attached to an acknowledged order that moved no quote currency
pub fn empty_fill_warning(side: Side, quote_asset: &str) -> String {
    let verb = match side {
        Side::Buy => "spent",
        Side::Sell => "received",
    };
    format!(
        "Order placed but no {} {}. Possible reason: dust, min notional, or the exchange rejected the trade.",
        quote_asset, verb
    )
}

/// Submits validated market orders
pub struct OrderExecutor<'a> {
    exchange: &'a dyn ExchangeApi,
}

impl<'a> OrderExecutor<'a> {
    pub fn new(exchange: &'a dyn ExchangeApi) -> Self {
        Self { exchange }
    }

    /// Submit a market order for exactly `quantity` and reconcile its fills
    pub async fn execute(
        &self,
        pair: &str,
        side: Side,
        quantity: Decimal,
        quoted_price: Decimal,
    ) -> Result<Execution, ExchangeError> {
        let started = Instant::now();
        let result = self.exchange.submit_market_order(pair, side, quantity).await;
        telemetry::record_latency(LatencyMetric::OrderSubmission, started.elapsed());

        match result {
            Ok(ack) => {
                telemetry::increment(CounterMetric::OrdersSubmitted, Some(side.label()));
                let execution = Execution::from_fills(&ack.fills, quoted_price);
                tracing::info!(
                    %pair,
                    %side,
                    order_id = ack.order_id,
                    filled = %execution.quantity,
                    quote_amount = %execution.quote_amount,
                    price = %execution.price,
                    "Order executed"
                );
                Ok(execution)
            }
            Err(e) => {
                telemetry::increment(CounterMetric::OrdersFailed, Some(side.label()));
                tracing::error!(%pair, %side, %quantity, error = %e, "Order submission failed");
                Err(e)
            }
        }
    }
}

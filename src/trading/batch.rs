//! Batch orchestration
//!
//! Runs every request of a batch through price resolution, quantity
//! normalization, rule validation and execution, one after another. An
//! item's failure is recorded on its own result and never stops the batch.

use super::executor::{empty_fill_warning, OrderExecutor};
use super::quantity::normalize_quantity;
use super::rules::TradingRules;
use super::{TradeError, TradeRequest, TradeResult};
use crate::exchange::{ExchangeApi, HoldingSnapshot, PriceTable, Side};
use crate::pricing::PriceResolver;
use crate::telemetry::{self, CounterMetric};
use chrono::Utc;
use rust_decimal::Decimal;

/// Sequential order pipeline shared by buys and sells
pub struct BatchOrchestrator<'a> {
    exchange: &'a dyn ExchangeApi,
    resolver: &'a PriceResolver,
    rules: &'a TradingRules,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        exchange: &'a dyn ExchangeApi,
        resolver: &'a PriceResolver,
        rules: &'a TradingRules,
    ) -> Self {
        Self {
            exchange,
            resolver,
            rules,
        }
    }

    /// Process `requests` in order against one price table and holding snapshot
    ///
    /// Requests for the quote asset itself, or whose normalized quantity is
    /// not positive, are skipped without a result. Every other request yields
    /// exactly one result, in input order.
    pub async fn run(
        &self,
        side: Side,
        requests: &[TradeRequest],
        prices: &PriceTable,
        holdings: &HoldingSnapshot,
    ) -> Vec<TradeResult> {
        let quote = self.resolver.quote_asset();
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            if request.symbol == quote {
                tracing::debug!(symbol = %request.symbol, "Skipping quote asset");
                telemetry::increment(CounterMetric::ItemsSkipped, Some(side.label()));
                continue;
            }

            let price = self.resolver.resolve(&request.symbol, prices).await;
            let quantity = normalize_quantity(request.requested_amount, price);

            if quantity <= Decimal::ZERO {
                tracing::debug!(
                    symbol = %request.symbol,
                    requested = %request.requested_amount,
                    %price,
                    "Skipping non-positive quantity"
                );
                telemetry::increment(CounterMetric::ItemsSkipped, Some(side.label()));
                continue;
            }

            tracing::debug!(
                symbol = %request.symbol,
                %side,
                held = %holdings.amount(&request.symbol),
                requested = %request.requested_amount,
                adjusted = %quantity,
                %price,
                "Processing trade request"
            );

            results.push(self.process(side, request, quantity, price).await);
        }

        results
    }

    async fn process(
        &self,
        side: Side,
        request: &TradeRequest,
        quantity: Decimal,
        price: Decimal,
    ) -> TradeResult {
        let pair = self.resolver.pair(&request.symbol);

        if let Err(e) = self
            .rules
            .validate(self.exchange, &pair, quantity, price)
            .await
        {
            if !matches!(e, TradeError::Exchange(_)) {
                telemetry::increment(CounterMetric::ItemsRejected, Some(side.label()));
            }
            tracing::warn!(%pair, %side, error = %e, "Trade request rejected");
            return TradeResult::failed(request, side, quantity, price, e.to_string());
        }

        let executor = OrderExecutor::new(self.exchange);
        match executor.execute(&pair, side, quantity, price).await {
            Ok(execution) => {
                let error = execution
                    .is_empty()
                    .then(|| empty_fill_warning(side, self.resolver.quote_asset()));

                TradeResult {
                    symbol: request.symbol.clone(),
                    side,
                    requested_amount: request.requested_amount,
                    amount: quantity,
                    price,
                    realized_price: execution.price,
                    realized_quantity: execution.quantity,
                    quote_amount: execution.quote_amount,
                    timestamp: Utc::now(),
                    error,
                }
            }
            Err(e) => TradeResult::failed(request, side, quantity, price, e.to_string()),
        }
    }
}

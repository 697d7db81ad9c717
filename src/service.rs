//! Account-facing operations
//!
//! Each call connects with the caller's credentials, takes one account and
//! price snapshot, and works from those snapshots for the rest of the call.
//! Failures before per-item processing starts are returned as a single
//! `ServiceError`; per-item failures live on the individual `TradeResult`s.

use crate::config::{Config, TradingConfig};
use crate::exchange::{
    BinanceConnector, Credentials, ExchangeConnector, ExchangeError, Holding, HoldingSnapshot,
    PriceTable, Side,
};
use crate::pricing::{CoinGeckoClient, FallbackPriceSource, PriceResolver};
use crate::telemetry::{self, LatencyMetric};
use crate::trading::{BatchOrchestrator, FilterCache, TradeRequest, TradeResult, TradingRules};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Request-level failures
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Credential, account or network failure while taking snapshots
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

/// A holding valued in the quote currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetValuation {
    pub symbol: String,
    pub amount: Decimal,
    pub price: Decimal,
    pub value: Decimal,
}

/// Holdings valuation and batch order execution
pub struct TradingService {
    connector: Arc<dyn ExchangeConnector>,
    resolver: PriceResolver,
    rules: TradingRules,
    min_sellable_value: Decimal,
}

impl TradingService {
    pub fn new(
        connector: Arc<dyn ExchangeConnector>,
        fallback: Arc<dyn FallbackPriceSource>,
        quote_asset: &str,
        trading: &TradingConfig,
    ) -> Self {
        Self {
            connector,
            resolver: PriceResolver::new(quote_asset, fallback),
            rules: TradingRules::new(quote_asset, FilterCache::new(trading.filter_cache_ttl())),
            min_sellable_value: trading.min_sellable_value,
        }
    }

    /// Wire up the Binance connector and CoinGecko fallback from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let connector = BinanceConnector::new(config.exchange.clone())?;
        let fallback = CoinGeckoClient::with_config(config.fallback.clone())?;

        Ok(Self::new(
            Arc::new(connector),
            Arc::new(fallback),
            &config.exchange.quote_asset,
            &config.trading,
        ))
    }

    pub fn quote_asset(&self) -> &str {
        self.resolver.quote_asset()
    }

    /// All holdings with a positive quote-currency value
    pub async fn holdings(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<AssetValuation>, ServiceError> {
        let (holdings, prices) = self.snapshot(credentials).await?;

        let mut assets = Vec::new();
        for holding in holdings.iter().filter(|h| !h.is_empty()) {
            let valuation = self.value(holding, &prices).await;
            if valuation.value > Decimal::ZERO {
                assets.push(valuation);
            }
        }

        tracing::info!(assets = assets.len(), "Valued holdings");
        Ok(assets)
    }

    /// Holdings other than the quote asset worth at least the sellable minimum
    pub async fn sellable_holdings(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<AssetValuation>, ServiceError> {
        let (holdings, prices) = self.snapshot(credentials).await?;

        let mut sellable = Vec::new();
        for holding in holdings
            .iter()
            .filter(|h| !h.is_empty() && h.symbol != self.quote_asset())
        {
            let valuation = self.value(holding, &prices).await;
            if valuation.value >= self.min_sellable_value {
                sellable.push(valuation);
            }
        }

        tracing::info!(assets = sellable.len(), "Valued sellable holdings");
        Ok(sellable)
    }

    /// Run a batch of market orders on one side
    pub async fn execute_batch(
        &self,
        credentials: &Credentials,
        side: Side,
        requests: &[TradeRequest],
    ) -> Result<Vec<TradeResult>, ServiceError> {
        let started = Instant::now();
        let exchange = self.connector.connect(credentials);

        let holdings = HoldingSnapshot::from_holdings(&exchange.account_snapshot().await?);
        let prices = exchange.price_table().await?;

        let results = BatchOrchestrator::new(exchange.as_ref(), &self.resolver, &self.rules)
            .run(side, requests, &prices, &holdings)
            .await;

        telemetry::record_latency(LatencyMetric::Batch, started.elapsed());
        tracing::info!(
            %side,
            requested = requests.len(),
            processed = results.len(),
            failed = results.iter().filter(|r| !r.is_success()).count(),
            "Batch complete"
        );

        Ok(results)
    }

    async fn snapshot(
        &self,
        credentials: &Credentials,
    ) -> Result<(Vec<Holding>, PriceTable), ServiceError> {
        let exchange = self.connector.connect(credentials);
        let holdings = exchange.account_snapshot().await?;
        let prices = exchange.price_table().await?;
        Ok((holdings, prices))
    }

    async fn value(&self, holding: &Holding, prices: &PriceTable) -> AssetValuation {
        let amount = holding.total();
        let price = if holding.symbol == self.quote_asset() {
            Decimal::ONE
        } else {
            self.resolver.resolve(&holding.symbol, prices).await
        };

        AssetValuation {
            symbol: holding.symbol.clone(),
            amount,
            price,
            value: amount.checked_mul(price).unwrap_or(Decimal::MAX),
        }
    }
}

//! Price resolution
//!
//! Prices come from the exchange's price table first and from a public
//! fallback source when the exchange has no usable quote.

mod coingecko;

pub use coingecko::{source_id, CoinGeckoClient};

use crate::exchange::PriceTable;
use crate::telemetry::{self, CounterMetric, LatencyMetric};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;

/// Trait for best-effort price sources queried by asset ticker
#[async_trait]
pub trait FallbackPriceSource: Send + Sync {
    /// Price of one unit of `asset` in `quote`
    async fn fetch_price(&self, asset: &str, quote: &str) -> anyhow::Result<Decimal>;
}

/// Resolves an asset's price in the quote currency
#[derive(Clone)]
pub struct PriceResolver {
    quote_asset: String,
    fallback: Arc<dyn FallbackPriceSource>,
}

impl PriceResolver {
    pub fn new(quote_asset: impl Into<String>, fallback: Arc<dyn FallbackPriceSource>) -> Self {
        Self {
            quote_asset: quote_asset.into(),
            fallback,
        }
    }

    pub fn quote_asset(&self) -> &str {
        &self.quote_asset
    }

    /// Trading pair of `asset` against the quote currency
    pub fn pair(&self, asset: &str) -> String {
        format!("{}{}", asset, self.quote_asset)
    }

    /// Resolve the price of `asset`
    ///
    /// Returns zero when neither the table nor the fallback source yields a
    /// positive price. Never fails.
    pub async fn resolve(&self, asset: &str, table: &PriceTable) -> Decimal {
        if let Some(price) = table.get(&self.pair(asset)) {
            if price > Decimal::ZERO {
                return price;
            }
        }

        let started = Instant::now();
        let result = self.fallback.fetch_price(asset, &self.quote_asset).await;
        telemetry::record_latency(LatencyMetric::FallbackPrice, started.elapsed());

        match result {
            Ok(price) if price > Decimal::ZERO => {
                tracing::debug!(%asset, %price, "Resolved price from fallback source");
                price
            }
            Ok(price) => {
                tracing::warn!(%asset, %price, "Fallback source returned no usable price");
                telemetry::increment(CounterMetric::FallbackMisses, None);
                Decimal::ZERO
            }
            Err(e) => {
                tracing::warn!(%asset, error = %e, "Fallback price lookup failed");
                telemetry::increment(CounterMetric::FallbackMisses, None);
                Decimal::ZERO
            }
        }
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Fallback source answering from a fixed table and recording lookups
    #[derive(Default)]
    pub struct StaticPriceSource {
        prices: HashMap<String, Decimal>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StaticPriceSource {
        pub fn new(prices: &[(&str, Decimal)]) -> Self {
            Self {
                prices: prices.iter().map(|(a, p)| (a.to_string(), *p)).collect(),
                calls: Mutex::new(vec![]),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FallbackPriceSource for StaticPriceSource {
        async fn fetch_price(&self, asset: &str, _quote: &str) -> anyhow::Result<Decimal> {
            self.calls.lock().unwrap().push(asset.to_string());
            self.prices
                .get(asset)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("no price for {}", asset))
        }
    }
}

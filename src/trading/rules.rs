//! Exchange trading-rule validation
//!
//! An order is only submitted when its pair carries both a lot-size and a
//! notional filter and the order clears both minimums.

use super::TradeError;
use crate::exchange::{ExchangeApi, SymbolFilter};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// The two constraints the order pipeline enforces for a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingFilters {
    /// LOT_SIZE minimum quantity
    pub min_quantity_step: Decimal,
    /// MIN_NOTIONAL or NOTIONAL minimum trade value
    pub min_notional_value: Decimal,
}

impl TradingFilters {
    /// Extract the enforced constraints, `None` if either filter is absent
    ///
    /// When several notional filters are present the first one listed wins.
    pub fn from_symbol_filters(filters: &[SymbolFilter]) -> Option<Self> {
        let min_quantity_step = filters.iter().find_map(|f| match f {
            SymbolFilter::LotSize { min_qty, .. } => Some(*min_qty),
            _ => None,
        })?;
        let min_notional_value = filters.iter().find_map(|f| match f {
            SymbolFilter::MinNotional { min_notional } | SymbolFilter::Notional { min_notional } => {
                Some(*min_notional)
            }
            _ => None,
        })?;

        Some(Self {
            min_quantity_step,
            min_notional_value,
        })
    }

    /// Check a quantity at a price against both minimums
    pub fn check(&self, quantity: Decimal, price: Decimal) -> Result<(), TradeError> {
        let trade_value = trade_value(quantity, price);

        if quantity < self.min_quantity_step || trade_value < self.min_notional_value {
            return Err(TradeError::BelowMinimum {
                quantity,
                min_quantity: self.min_quantity_step,
                trade_value,
                min_notional: self.min_notional_value,
            });
        }

        Ok(())
    }
}

/// Quote value of `quantity` at `price`, saturating on overflow
pub fn trade_value(quantity: Decimal, price: Decimal) -> Decimal {
    quantity.checked_mul(price).unwrap_or(Decimal::MAX)
}

/// Time-bounded cache of trading filters keyed by pair
pub struct FilterCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, TradingFilters)>>,
}

impl FilterCache {
    /// Create a cache; a zero TTL disables it
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub async fn get(&self, pair: &str) -> Option<TradingFilters> {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(pair)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, filters)| *filters)
    }

    pub async fn insert(&self, pair: &str, filters: TradingFilters) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(pair.to_string(), (Instant::now(), filters));
    }
}

/// Trading-rule validator
pub struct TradingRules {
    quote_asset: String,
    cache: FilterCache,
}

impl TradingRules {
    pub fn new(quote_asset: impl Into<String>, cache: FilterCache) -> Self {
        Self {
            quote_asset: quote_asset.into(),
            cache,
        }
    }

    /// Fetch the pair's filters, from cache when still fresh
    pub async fn filters_for(
        &self,
        exchange: &dyn ExchangeApi,
        pair: &str,
    ) -> Result<TradingFilters, TradeError> {
        if let Some(filters) = self.cache.get(pair).await {
            tracing::trace!(%pair, "Trading filters served from cache");
            return Ok(filters);
        }

        let raw = exchange.symbol_filters(pair).await?;
        tracing::debug!(%pair, filters = ?raw, "Fetched trading filters");

        let filters = raw
            .as_deref()
            .and_then(TradingFilters::from_symbol_filters)
            .ok_or_else(|| TradeError::FilterUnavailable {
                pair: pair.to_string(),
                quote: self.quote_asset.clone(),
            })?;

        self.cache.insert(pair, filters).await;
        Ok(filters)
    }

    /// Validate a normalized quantity at the resolved price
    pub async fn validate(
        &self,
        exchange: &dyn ExchangeApi,
        pair: &str,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<TradingFilters, TradeError> {
        let filters = self.filters_for(exchange, pair).await?;
        tracing::debug!(
            %pair,
            %quantity,
            %price,
            min_qty = %filters.min_quantity_step,
            min_notional = %filters.min_notional_value,
            trade_value = %trade_value(quantity, price),
            "Validating order against trading filters"
        );

        filters.check(quantity, price)?;
        Ok(filters)
    }
}

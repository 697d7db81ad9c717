//! Exchange module
//!
//! Account snapshots, price tables, trading filters and market order
//! submission against the Binance spot REST API

mod binance;
mod error;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use binance::{BinanceClient, BinanceConnector};
pub use error::ExchangeError;
pub use types::{
    Credentials, Fill, Holding, HoldingSnapshot, OrderAck, PriceTable, Side, SymbolFilter,
    TickerPrice,
};

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for exchange API implementations bound to one set of credentials
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Fetch the account's balances
    async fn account_snapshot(&self) -> Result<Vec<Holding>, ExchangeError>;
    /// Fetch the last traded price of every listed pair
    async fn price_table(&self) -> Result<PriceTable, ExchangeError>;
    /// Fetch the trading filters of a pair, `None` if the pair is not listed
    async fn symbol_filters(&self, pair: &str) -> Result<Option<Vec<SymbolFilter>>, ExchangeError>;
    /// Submit a market order for an exact base-asset quantity
    async fn submit_market_order(
        &self,
        pair: &str,
        side: Side,
        quantity: Decimal,
    ) -> Result<OrderAck, ExchangeError>;
}

/// Builds exchange clients from caller-supplied credentials
///
/// Implementations hold no per-account state; every call returns a client
/// bound only to the credentials it was given.
pub trait ExchangeConnector: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Box<dyn ExchangeApi>;
}

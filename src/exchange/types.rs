//! Exchange wire and domain types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// API key pair supplied by the caller for a single request
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Exchange wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Metric label
    pub fn label(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One asset balance from the account snapshot
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Holding {
    #[serde(rename = "asset")]
    pub symbol: String,
    #[serde(rename = "free")]
    pub free_amount: Decimal,
    #[serde(rename = "locked")]
    pub locked_amount: Decimal,
}

impl Holding {
    pub fn total(&self) -> Decimal {
        self.free_amount + self.locked_amount
    }

    pub fn is_empty(&self) -> bool {
        self.free_amount <= Decimal::ZERO && self.locked_amount <= Decimal::ZERO
    }
}

/// Total held amount per asset, taken once at the start of a batch
///
/// Not refreshed while the batch runs: trades placed through other channels
/// in the meantime are not reflected.
#[derive(Debug, Clone, Default)]
pub struct HoldingSnapshot {
    totals: HashMap<String, Decimal>,
}

impl HoldingSnapshot {
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let totals = holdings
            .iter()
            .map(|h| (h.symbol.clone(), h.total()))
            .collect();
        Self { totals }
    }

    /// Total held amount of an asset, zero if not held
    pub fn amount(&self, asset: &str) -> Decimal {
        self.totals.get(asset).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Last traded price per trading pair
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, Decimal>,
}

/// Entry of the exchange's ticker price list
#[derive(Debug, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: Decimal,
}

impl PriceTable {
    pub fn new(prices: HashMap<String, Decimal>) -> Self {
        Self { prices }
    }

    pub fn get(&self, pair: &str) -> Option<Decimal> {
        self.prices.get(pair).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<TickerPrice>> for PriceTable {
    fn from(tickers: Vec<TickerPrice>) -> Self {
        tickers.into_iter().map(|t| (t.symbol, t.price)).collect()
    }
}

/// A trading rule attached to a pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize {
        min_qty: Decimal,
        max_qty: Decimal,
        step_size: Decimal,
    },
    #[serde(rename = "MIN_NOTIONAL", rename_all = "camelCase")]
    MinNotional { min_notional: Decimal },
    #[serde(rename = "NOTIONAL", rename_all = "camelCase")]
    Notional { min_notional: Decimal },
    /// Any filter the order pipeline does not enforce
    #[serde(other)]
    Other,
}

/// An execution record of a submitted order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fill {
    pub price: Decimal,
    pub qty: Decimal,
    #[serde(default)]
    pub commission: Decimal,
    #[serde(default, rename = "commissionAsset")]
    pub commission_asset: String,
}

impl Fill {
    pub fn new(qty: Decimal, price: Decimal) -> Self {
        Self {
            price,
            qty,
            commission: Decimal::ZERO,
            commission_asset: String::new(),
        }
    }
}

/// Acknowledgement of a submitted order with its fills
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: u64,
    #[serde(default)]
    pub client_order_id: String,
    pub status: String,
    #[serde(default)]
    pub fills: Vec<Fill>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("key-123", "very-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("key-123"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_side_wire_format() {
        assert_eq!(Side::Buy.as_str(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
        let side: Side = serde_json::from_str(r#""sell""#).unwrap();
        assert_eq!(side, Side::Sell);
    }

    #[test]
    fn test_holding_parse_and_total() {
        let json = r#"{"asset":"BTC","free":"0.50000000","locked":"0.25000000"}"#;
        let holding: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(holding.symbol, "BTC");
        assert_eq!(holding.total(), dec!(0.75));
        assert!(!holding.is_empty());
    }

    #[test]
    fn test_holding_empty() {
        let json = r#"{"asset":"LTC","free":"0.00000000","locked":"0.00000000"}"#;
        let holding: Holding = serde_json::from_str(json).unwrap();
        assert!(holding.is_empty());
    }

    #[test]
    fn test_holding_snapshot_amount() {
        let snapshot = HoldingSnapshot::from_holdings(&[Holding {
            symbol: "ETH".to_string(),
            free_amount: dec!(1.5),
            locked_amount: dec!(0.5),
        }]);
        assert_eq!(snapshot.amount("ETH"), dec!(2));
        assert_eq!(snapshot.amount("DOGE"), dec!(0));
    }

    #[test]
    fn test_price_table_from_tickers() {
        let json = r#"[{"symbol":"BTCUSDT","price":"65000.10"},{"symbol":"ETHBTC","price":"0.05"}]"#;
        let tickers: Vec<TickerPrice> = serde_json::from_str(json).unwrap();
        let table = PriceTable::from(tickers);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("BTCUSDT"), Some(dec!(65000.10)));
        assert!(table.get("XRPUSDT").is_none());
    }

    #[test]
    fn test_symbol_filter_parse() {
        let json = r#"[
            {"filterType":"PRICE_FILTER","minPrice":"0.01","maxPrice":"1000000.00","tickSize":"0.01"},
            {"filterType":"LOT_SIZE","minQty":"0.00001000","maxQty":"9000.00000000","stepSize":"0.00001000"},
            {"filterType":"NOTIONAL","minNotional":"5.00000000","applyMinToMarket":true,"maxNotional":"9000000.00000000","applyMaxToMarket":false,"avgPriceMins":5},
            {"filterType":"MIN_NOTIONAL","minNotional":"10.00000000","applyToMarket":true,"avgPriceMins":5}
        ]"#;
        let filters: Vec<SymbolFilter> = serde_json::from_str(json).unwrap();
        assert_eq!(filters[0], SymbolFilter::Other);
        assert_eq!(
            filters[1],
            SymbolFilter::LotSize {
                min_qty: dec!(0.00001),
                max_qty: dec!(9000),
                step_size: dec!(0.00001),
            }
        );
        assert_eq!(filters[2], SymbolFilter::Notional { min_notional: dec!(5) });
        assert_eq!(filters[3], SymbolFilter::MinNotional { min_notional: dec!(10) });
    }

    #[test]
    fn test_order_ack_parse_full_response() {
        let json = r#"{
            "symbol":"BTCUSDT","orderId":28,"orderListId":-1,
            "clientOrderId":"6gCrw2kRUAF9CvJDGP16IP","transactTime":1507725176595,
            "price":"0.00000000","origQty":"3.00000000","executedQty":"3.00000000",
            "cummulativeQuoteQty":"31.00000000","status":"FILLED","type":"MARKET","side":"SELL",
            "fills":[
                {"price":"10.00000000","qty":"2.00000000","commission":"0.02","commissionAsset":"USDT","tradeId":56},
                {"price":"11.00000000","qty":"1.00000000","commission":"0.011","commissionAsset":"USDT","tradeId":57}
            ]
        }"#;
        let ack: OrderAck = serde_json::from_str(json).unwrap();
        assert_eq!(ack.order_id, 28);
        assert_eq!(ack.status, "FILLED");
        assert_eq!(ack.fills.len(), 2);
        assert_eq!(ack.fills[1], Fill {
            price: dec!(11),
            qty: dec!(1),
            commission: dec!(0.011),
            commission_asset: "USDT".to_string(),
        });
    }

    #[test]
    fn test_order_ack_without_fills() {
        let json = r#"{"symbol":"BTCUSDT","orderId":29,"status":"EXPIRED"}"#;
        let ack: OrderAck = serde_json::from_str(json).unwrap();
        assert!(ack.fills.is_empty());
    }
}

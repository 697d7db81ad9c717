//! Binance spot REST client
//!
//! Signed endpoints carry an HMAC-SHA256 signature of the query string and
//! the API key in the `X-MBX-APIKEY` header.

use super::{
    Credentials, ExchangeApi, ExchangeConnector, ExchangeError, Holding, OrderAck, PriceTable,
    Side, SymbolFilter, TickerPrice,
};
use crate::config::ExchangeConfig;
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Error code Binance returns for an unknown trading pair
const INVALID_SYMBOL: i64 = -1121;

/// Creates Binance clients that share one HTTP connection pool
pub struct BinanceConnector {
    http: Client,
    config: ExchangeConfig,
}

impl BinanceConnector {
    pub fn new(config: ExchangeConfig) -> Result<Self, ExchangeError> {
        let http = Client::builder()
            .user_agent(concat!("minance/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }
}

impl ExchangeConnector for BinanceConnector {
    fn connect(&self, credentials: &Credentials) -> Box<dyn ExchangeApi> {
        Box::new(BinanceClient::new(
            self.http.clone(),
            &self.config,
            credentials.clone(),
        ))
    }
}

/// Binance client bound to one account's credentials
pub struct BinanceClient {
    http: Client,
    base_url: String,
    recv_window_ms: u64,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct AccountInformation {
    balances: Vec<Holding>,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    filters: Vec<SymbolFilter>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

impl BinanceClient {
    pub fn new(http: Client, config: &ExchangeConfig, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recv_window_ms: config.recv_window_ms,
            credentials,
        }
    }

    fn sign(&self, query: &str) -> Result<String, ExchangeError> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| ExchangeError::Signing(e.to_string()))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Append recvWindow, timestamp and signature to a query string
    fn signed_query(&self, params: &str) -> Result<String, ExchangeError> {
        let timestamp = Utc::now().timestamp_millis();
        let params = if params.is_empty() {
            format!("recvWindow={}&timestamp={}", self.recv_window_ms, timestamp)
        } else {
            format!(
                "{}&recvWindow={}&timestamp={}",
                params, self.recv_window_ms, timestamp
            )
        };
        let signature = self.sign(&params)?;
        Ok(format!("{}&signature={}", params, signature))
    }

    async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ExchangeError> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ExchangeError::Decode(e.to_string()))
    }
}

fn parse_api_error(status: u16, body: &str) -> ExchangeError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) => ExchangeError::Api {
            status,
            code: err.code,
            msg: err.msg,
        },
        Err(_) => ExchangeError::Api {
            status,
            code: 0,
            msg: body.chars().take(200).collect(),
        },
    }
}

/// Binance pairs are upper-case ASCII letters and digits
///
/// Pairs are interpolated into signed query strings, so anything else is
/// rejected before a request is built.
fn check_symbol(pair: &str) -> Result<(), ExchangeError> {
    let valid = !pair.is_empty()
        && pair
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(ExchangeError::InvalidSymbol(pair.to_string()))
    }
}

/// Render a quantity without trailing zeros
fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

#[async_trait]
impl ExchangeApi for BinanceClient {
    async fn account_snapshot(&self) -> Result<Vec<Holding>, ExchangeError> {
        let url = format!("{}/api/v3/account?{}", self.base_url, self.signed_query("")?);

        let resp = self
            .http
            .get(&url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await?;

        let account: AccountInformation = Self::read_json(resp).await?;
        tracing::debug!(balances = account.balances.len(), "Fetched account snapshot");
        Ok(account.balances)
    }

    async fn price_table(&self) -> Result<PriceTable, ExchangeError> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let resp = self.http.get(&url).send().await?;

        let tickers: Vec<TickerPrice> = Self::read_json(resp).await?;
        tracing::debug!(pairs = tickers.len(), "Fetched price table");
        Ok(PriceTable::from(tickers))
    }

    async fn symbol_filters(&self, pair: &str) -> Result<Option<Vec<SymbolFilter>>, ExchangeError> {
        if check_symbol(pair).is_err() {
            tracing::debug!(%pair, "Pair cannot be listed, skipping exchangeInfo lookup");
            return Ok(None);
        }

        let url = format!("{}/api/v3/exchangeInfo", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("symbol", pair)])
            .send()
            .await?;

        match Self::read_json::<ExchangeInfo>(resp).await {
            Ok(info) => Ok(info
                .symbols
                .into_iter()
                .find(|s| s.symbol == pair)
                .map(|s| s.filters)),
            Err(e) if e.code() == Some(INVALID_SYMBOL) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn submit_market_order(
        &self,
        pair: &str,
        side: Side,
        quantity: Decimal,
    ) -> Result<OrderAck, ExchangeError> {
        check_symbol(pair)?;
        let params = format!(
            "symbol={}&side={}&type=MARKET&quantity={}&newClientOrderId={}&newOrderRespType=FULL",
            pair,
            side.as_str(),
            format_quantity(quantity),
            Uuid::new_v4().simple(),
        );
        let url = format!("{}/api/v3/order?{}", self.base_url, self.signed_query(&params)?);

        tracing::info!(%pair, %side, %quantity, "Placing market order");

        let resp = self
            .http
            .post(&url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await?;

        let ack: OrderAck = Self::read_json(resp).await?;
        tracing::info!(
            %pair,
            order_id = ack.order_id,
            status = %ack.status,
            fills = ack.fills.len(),
            "Market order acknowledged"
        );
        Ok(ack)
    }
}

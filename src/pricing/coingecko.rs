//! CoinGecko simple-price client used as the fallback price source

use super::FallbackPriceSource;
use crate::config::FallbackConfig;
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Tickers whose CoinGecko id is not the lowercased ticker
const BUILTIN_ID_OVERRIDES: &[(&str, &str)] = &[("SOLV", "solv-protocol")];

/// Response shape: `{ "<id>": { "<quote>": price } }`
type SimplePriceResponse = HashMap<String, HashMap<String, Decimal>>;

/// Map a ticker to its CoinGecko id
pub fn source_id(asset: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(id) = overrides.get(asset) {
        return id.clone();
    }
    BUILTIN_ID_OVERRIDES
        .iter()
        .find(|(ticker, _)| *ticker == asset)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| asset.to_lowercase())
}

/// Client for CoinGecko's `/simple/price` endpoint
pub struct CoinGeckoClient {
    config: FallbackConfig,
    client: Client,
}

impl CoinGeckoClient {
    pub fn with_config(config: FallbackConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { config, client })
    }
}

fn extract_price(mut body: SimplePriceResponse, id: &str, quote: &str) -> Option<Decimal> {
    body.remove(id)?.remove(quote)
}

#[async_trait]
impl FallbackPriceSource for CoinGeckoClient {
    async fn fetch_price(&self, asset: &str, quote: &str) -> anyhow::Result<Decimal> {
        let id = source_id(asset, &self.config.id_overrides);
        let quote = quote.to_lowercase();
        let url = format!("{}/simple/price", self.config.base_url.trim_end_matches('/'));

        tracing::debug!(%asset, %id, "Querying fallback price source");

        let response = self
            .client
            .get(&url)
            .query(&[("ids", id.as_str()), ("vs_currencies", quote.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("CoinGecko API error: {}", response.status());
        }

        let body: SimplePriceResponse = response.json().await?;
        extract_price(body, &id, &quote)
            .ok_or_else(|| anyhow::anyhow!("No {} price for {}", quote, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::{Duration, Instant};

    #[test]
    fn test_source_id_defaults_to_lowercase() {
        assert_eq!(source_id("PEPE", &HashMap::new()), "pepe");
    }

    #[test]
    fn test_source_id_builtin_override() {
        assert_eq!(source_id("SOLV", &HashMap::new()), "solv-protocol");
    }

    #[test]
    fn test_source_id_config_override_wins() {
        let overrides = HashMap::from([
            ("SOLV".to_string(), "solv-v2".to_string()),
            ("WBTC".to_string(), "wrapped-bitcoin".to_string()),
        ]);
        assert_eq!(source_id("SOLV", &overrides), "solv-v2");
        assert_eq!(source_id("WBTC", &overrides), "wrapped-bitcoin");
    }

    #[test]
    fn test_extract_price() {
        let body: SimplePriceResponse =
            serde_json::from_str(r#"{"solv-protocol":{"usdt":0.0312}}"#).unwrap();
        assert_eq!(
            extract_price(body, "solv-protocol", "usdt"),
            Some(dec!(0.0312))
        );
    }

    #[test]
    fn test_extract_price_missing_quote() {
        let body: SimplePriceResponse = serde_json::from_str(r#"{"pepe":{}}"#).unwrap();
        assert!(extract_price(body, "pepe", "usdt").is_none());
    }

    #[test]
    fn test_extract_price_unknown_id() {
        let body: SimplePriceResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_price(body, "nothing", "usdt").is_none());
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = vec![];
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = CoinGeckoClient::with_config(FallbackConfig {
            base_url: format!("http://{}", addr),
            timeout_secs: 1,
            id_overrides: HashMap::new(),
        })
        .unwrap();

        let started = Instant::now();
        let result = client.fetch_price("BTC", "USDT").await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}

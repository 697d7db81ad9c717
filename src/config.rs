//! Configuration types for minance

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub trading: TradingConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://minance-ashen.vercel.app".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Exchange REST API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    /// REST base URL
    #[serde(default = "default_exchange_url")]
    pub base_url: String,

    /// Signed request validity window (milliseconds)
    #[serde(default = "default_recv_window")]
    pub recv_window_ms: u64,

    /// Settlement asset every holding is valued in
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
}

fn default_exchange_url() -> String {
    "https://api.binance.com".to_string()
}
fn default_recv_window() -> u64 {
    5000
}
fn default_quote_asset() -> String {
    "USDT".to_string()
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_exchange_url(),
            recv_window_ms: default_recv_window(),
            quote_asset: default_quote_asset(),
        }
    }
}

/// Public fallback price source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FallbackConfig {
    /// Base URL of the CoinGecko-compatible API
    #[serde(default = "default_fallback_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_fallback_timeout")]
    pub timeout_secs: u64,

    /// Extra ticker -> source id mappings, merged over the built-in ones
    #[serde(default)]
    pub id_overrides: HashMap<String, String>,
}

fn default_fallback_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}
fn default_fallback_timeout() -> u64 {
    5
}

impl FallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_url: default_fallback_url(),
            timeout_secs: default_fallback_timeout(),
            id_overrides: HashMap::new(),
        }
    }
}

/// Order pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingConfig {
    /// Holdings worth less than this (in quote units) are not offered for sale
    #[serde(default = "default_min_sellable_value")]
    pub min_sellable_value: Decimal,

    /// How long fetched trading filters stay valid (seconds, 0 = no caching)
    #[serde(default = "default_filter_cache_ttl")]
    pub filter_cache_ttl_secs: u64,
}

fn default_min_sellable_value() -> Decimal {
    Decimal::new(5, 0)
}
fn default_filter_cache_ttl() -> u64 {
    60
}

impl TradingConfig {
    pub fn filter_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.filter_cache_ttl_secs)
    }
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            min_sellable_value: default_min_sellable_value(),
            filter_cache_ttl_secs: default_filter_cache_ttl(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus scrape port; metrics are not exported when unset
    pub metrics_port: Option<u16>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

//! minance: exchange account backend for a portfolio frontend
//!
//! This library provides the core components for:
//! - Signed Binance REST access with per-request credentials
//! - Spot pricing with a CoinGecko fallback for unlisted assets
//! - Holdings valuation and sellable-asset filtering
//! - Batch market orders with exchange rule validation
//! - An HTTP API for the web frontend
//! - Structured logging and Prometheus metrics

pub mod api;
pub mod cli;
pub mod config;
pub mod exchange;
pub mod pricing;
pub mod service;
pub mod telemetry;
pub mod trading;

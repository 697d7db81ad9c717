//! Exchange error types

use thiserror::Error;

/// Errors returned by exchange API calls
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Network or transport failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The exchange rejected the request
    #[error("APIError(code={code}): {msg}")]
    Api { status: u16, code: i64, msg: String },
    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// The request could not be signed
    #[error("Failed to sign request: {0}")]
    Signing(String),
    /// Trading pair contains characters Binance never uses
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}

impl ExchangeError {
    /// Binance error code, if the exchange returned one
    pub fn code(&self) -> Option<i64> {
        match self {
            ExchangeError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

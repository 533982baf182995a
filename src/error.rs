//! Error types for rate resolution.

use crate::models::CurrencyCode;
use thiserror::Error;

/// Fetching the rate table failed. Never retried automatically.
#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("Rate request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request limit exceeded")]
    LimitExceeded,

    #[error("Error fetching exchange rates: HTTP {0}")]
    Status(u16),

    #[error("Malformed rate response: {0}")]
    Malformed(String),
}

/// One or more codes are absent from the rate table.
#[derive(Debug, Error, PartialEq)]
#[error("Currency not supported: {}", join_codes(.codes))]
pub struct UnsupportedCurrencyError {
    pub codes: Vec<CurrencyCode>,
}

fn join_codes(codes: &[CurrencyCode]) -> String {
    codes
        .iter()
        .map(CurrencyCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors surfaced by [`crate::RateResolver`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] RateFetchError),

    #[error(transparent)]
    UnsupportedCurrency(#[from] UnsupportedCurrencyError),
}

/// Cache storage faults. The resolver logs these and carries on.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cache IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid currency code: {0:?}")]
pub struct InvalidCurrencyCode(pub String);

pub type ResolveResult<T> = Result<T, ResolveError>;

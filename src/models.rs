use crate::error::InvalidCurrencyCode;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr, time::Duration};

/// An upper-case, three-letter ISO 4217 code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: &str) -> Result<Self, InvalidCurrencyCode> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.len() == 3 && normalized.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(normalized))
        } else {
            Err(InvalidCurrencyCode(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body returned by the rate endpoint. Only `rates` is read.
#[derive(Serialize, Deserialize)]
pub struct Rates {
    pub rates: HashMap<String, f64>,
}

/// A base-relative rate table and the moment it was fetched.
///
/// `rates[code]` is how many units of `code` one unit of the base buys.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RateSnapshot {
    pub captured_at: i64,
    pub rates: HashMap<String, f64>,
}

impl RateSnapshot {
    pub fn new(captured_at: i64, rates: HashMap<String, f64>) -> Self {
        Self { captured_at, rates }
    }

    /// Fresh while `now - captured_at < ttl`.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_sub(self.captured_at) < ttl_millis
    }

    /// Rate of `code` against `base`; the base itself is always 1.
    pub fn rate_for(&self, code: &CurrencyCode, base: &str) -> Option<f64> {
        if code.as_str() == base {
            Some(1.0)
        } else {
            self.rates.get(code.as_str()).copied()
        }
    }

    /// Every rate must be finite and positive, and the table non-empty.
    pub fn validate(&self) -> Result<(), String> {
        validate_rates(&self.rates)
    }

    /// Codes in the table, sorted.
    pub fn sorted_rates(&self) -> Vec<(&str, f64)> {
        let mut rows: Vec<(&str, f64)> = self
            .rates
            .iter()
            .map(|(code, rate)| (code.as_str(), *rate))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

pub fn validate_rates(rates: &HashMap<String, f64>) -> Result<(), String> {
    if rates.is_empty() {
        return Err("empty rate table".to_string());
    }
    match rates
        .iter()
        .find(|(_, rate)| !rate.is_finite() || **rate <= 0.0)
    {
        Some((code, rate)) => Err(format!("invalid rate {rate} for {code}")),
        None => Ok(()),
    }
}

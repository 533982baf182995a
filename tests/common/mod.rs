//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use currency_rates::{Clock, RateFetchError, RateSource};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

pub const HOUR_MS: i64 = 60 * 60 * 1000;

pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn at(millis: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(millis)))
    }

    pub fn set(&self, millis: i64) {
        self.0.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serves a fixed table, or fails every call when built with `unavailable`.
pub struct StaticSource {
    rates: Option<HashMap<String, f64>>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn with_rates(rates: &[(&str, f64)]) -> Arc<Self> {
        Arc::new(Self {
            rates: Some(rates.iter().map(|(c, r)| (c.to_string(), *r)).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            rates: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateSource for StaticSource {
    async fn fetch_rates(&self, _base: &str) -> Result<HashMap<String, f64>, RateFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rates.clone().ok_or(RateFetchError::LimitExceeded)
    }
}

/// A small USD-based table used across tests.
pub fn sample_rates() -> Vec<(&'static str, f64)> {
    vec![("USD", 1.0), ("EUR", 0.9), ("GBP", 0.8), ("CHF", 0.88), ("JPY", 150.0)]
}

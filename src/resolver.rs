//! Cross-rate resolution over a cached, base-relative rate table.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::RateSource;
use crate::cache::KeyValueStore;
use crate::clock::Clock;
use crate::config::ResolverConfig;
use crate::error::{RateFetchError, ResolveResult, UnsupportedCurrencyError};
use crate::models::{CurrencyCode, RateSnapshot};

/// Resolves conversion factors between currencies.
///
/// All rates are kept relative to one base currency in a single cache slot. A miss or
/// an expired slot costs one fetch and one write. Concurrent misses are not coalesced:
/// each fetches on its own and the last write wins.
pub struct RateResolver {
    clock: Arc<dyn Clock>,
    source: Arc<dyn RateSource>,
    store: Arc<dyn KeyValueStore>,
    config: ResolverConfig,
}

impl RateResolver {
    pub fn new(
        clock: Arc<dyn Clock>,
        source: Arc<dyn RateSource>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self::with_config(clock, source, store, ResolverConfig::default())
    }

    pub fn with_config(
        clock: Arc<dyn Clock>,
        source: Arc<dyn RateSource>,
        store: Arc<dyn KeyValueStore>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            clock,
            source,
            store,
            config,
        }
    }

    pub fn base(&self) -> &str {
        &self.config.base
    }

    /// Factor such that `amount_in_target = amount_in_source * factor`.
    pub async fn resolve(
        &self,
        source: &CurrencyCode,
        target: &CurrencyCode,
    ) -> ResolveResult<f64> {
        if source == target {
            return Ok(1.0);
        }

        let snapshot = self.snapshot().await?;
        let base = self.base();

        let source_rate = snapshot.rate_for(source, base);
        let target_rate = snapshot.rate_for(target, base);

        match (source_rate, target_rate) {
            (Some(from), Some(to)) => Ok(to / from),
            _ => {
                let mut codes = Vec::new();
                if source_rate.is_none() {
                    codes.push(source.clone());
                }
                if target_rate.is_none() {
                    codes.push(target.clone());
                }
                Err(UnsupportedCurrencyError { codes }.into())
            }
        }
    }

    pub async fn convert(
        &self,
        amount: f64,
        source: &CurrencyCode,
        target: &CurrencyCode,
    ) -> ResolveResult<f64> {
        Ok(amount * self.resolve(source, target).await?)
    }

    /// The cached table if still fresh, otherwise a newly fetched one.
    pub async fn snapshot(&self) -> ResolveResult<RateSnapshot> {
        let now = self.clock.now_millis();

        if let Some(cached) = self.load_cached().await {
            if cached.is_fresh(now, self.config.ttl) {
                debug!(key = %self.config.cache_key, captured_at = cached.captured_at, "Cache hit");
                return Ok(cached);
            }
            debug!(key = %self.config.cache_key, captured_at = cached.captured_at, "Cache entry expired");
        } else {
            debug!(key = %self.config.cache_key, "Cache miss");
        }

        self.fetch_and_store(now).await
    }

    /// Fetch and persist a new table, whatever the cache holds.
    pub async fn refresh(&self) -> ResolveResult<RateSnapshot> {
        let now = self.clock.now_millis();
        self.fetch_and_store(now).await
    }

    async fn fetch_and_store(&self, now: i64) -> ResolveResult<RateSnapshot> {
        let rates = self.source.fetch_rates(self.base()).await?;
        info!(base = %self.base(), count = rates.len(), "Fetched rate table");

        let snapshot = RateSnapshot::new(now, rates);
        snapshot.validate().map_err(RateFetchError::Malformed)?;
        self.store_snapshot(&snapshot).await;
        Ok(snapshot)
    }

    async fn load_cached(&self) -> Option<RateSnapshot> {
        let key = &self.config.cache_key;
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str::<RateSnapshot>(&raw) {
            Ok(snapshot) => match snapshot.validate() {
                Ok(()) => Some(snapshot),
                Err(reason) => {
                    warn!(key = %key, reason = %reason, "Cached snapshot has unusable rates, treating as miss");
                    None
                }
            },
            Err(e) => {
                warn!(key = %key, error = %e, "Cached snapshot unreadable, treating as miss");
                None
            }
        }
    }

    async fn store_snapshot(&self, snapshot: &RateSnapshot) {
        let key = &self.config.cache_key;
        let value = match serde_json::to_string(snapshot) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Could not encode snapshot");
                return;
            }
        };

        match self.store.set(key, value).await {
            Ok(()) => info!(key = %key, captured_at = snapshot.captured_at, "Stored rate snapshot"),
            Err(e) => warn!(key = %key, error = %e, "Cache write failed"),
        }
    }
}

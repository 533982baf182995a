//! Currency conversion factors from a cached, USD-based rate table.
//!
//! [`RateResolver`] answers "how many units of B per unit of A" by dividing two
//! base-relative rates. The table lives in one [`KeyValueStore`] slot for 24 hours;
//! after that, or when the slot is missing, the next call fetches a new table from a
//! [`RateSource`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use currency_rates::{CurrencyCode, FileStore, HttpRateSource, RateResolver, Settings, SystemClock};
//!
//! let settings = Settings::from_env();
//! let resolver = RateResolver::new(
//!     Arc::new(SystemClock),
//!     Arc::new(HttpRateSource::new(&settings)?),
//!     Arc::new(FileStore::new(&settings.cache_file)),
//! );
//! let factor = resolver.resolve(&"EUR".parse()?, &"GBP".parse()?).await?;
//! ```

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;

pub use api::{HttpRateSource, RateSource};
pub use cache::{FileStore, KeyValueStore, MemoryStore};
pub use clock::{Clock, SystemClock};
pub use config::{ResolverConfig, Settings};
pub use error::{
    InvalidCurrencyCode, RateFetchError, ResolveError, StoreError, UnsupportedCurrencyError,
};
pub use models::{CurrencyCode, RateSnapshot};
pub use resolver::RateResolver;

use std::{env, path::PathBuf, time::Duration};

pub const BASE_CURRENCY: &str = "USD";
pub const CACHE_KEY: &str = "currency_rates_usd_v1";
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub const DEFAULT_API_URL: &str = "https://api.exchangerate-api.com/v4/latest";
pub const DEFAULT_CACHE_FILE: &str = ".currency_cache.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings, read from the environment (and `.env` via dotenv in the binary).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub api_key: Option<String>,
    pub cache_file: PathBuf,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_url: non_empty("API_URL").unwrap_or(defaults.api_url),
            api_key: non_empty("API_KEY"),
            cache_file: non_empty("CACHE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_file),
            timeout: non_empty("RATES_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Knobs the resolver runs with. Production code uses the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub base: String,
    pub cache_key: String,
    pub ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            cache_key: CACHE_KEY.to_string(),
            ttl: CACHE_TTL,
        }
    }
}

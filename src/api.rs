use crate::config::Settings;
use crate::error::RateFetchError;
use crate::models::{validate_rates, Rates};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use tracing::debug;

/// Where base-relative rate tables come from.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>, RateFetchError>;
}

/// Rate table over HTTP from an exchangerate-api compatible endpoint.
pub struct HttpRateSource {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpRateSource {
    pub fn new(settings: &Settings) -> Result<Self, RateFetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn url_for(&self, base: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), base)
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, f64>, RateFetchError> {
        let api_url = self.url_for(base);
        debug!(base, url = %self.api_url, "Requesting rate table");

        let mut request = self.client.get(&api_url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("access_key", key)]);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            parse_rates(&body)
        } else if status == StatusCode::FORBIDDEN {
            Err(RateFetchError::LimitExceeded)
        } else {
            Err(RateFetchError::Status(status.as_u16()))
        }
    }
}

/// Pull the `rates` map out of a response body and reject unusable values.
pub fn parse_rates(body: &str) -> Result<HashMap<String, f64>, RateFetchError> {
    let parsed: Rates =
        serde_json::from_str(body).map_err(|e| RateFetchError::Malformed(e.to_string()))?;

    validate_rates(&parsed.rates).map_err(RateFetchError::Malformed)?;
    Ok(parsed.rates)
}

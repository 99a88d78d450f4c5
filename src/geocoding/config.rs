use std::time::Duration;

use crate::config::Config;
use crate::constants::{DEFAULT_COUNTRY, DEFAULT_RATE_LIMIT_BACKOFF_SECS, DEFAULT_REGION};

pub const DEFAULT_PLACES_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/textsearch/json";

pub const DEFAULT_LANGUAGE: &str = "pt";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub region: String,
    pub language: String,
    /// Appended to every query.
    pub country: String,
    pub rate_limit_backoff: Duration,
    pub request_timeout: Duration,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_PLACES_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            rate_limit_backoff: Duration::from_secs(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GeocodingConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.geocoding_api_key.clone(),
            region: config.geocoding_region.clone(),
            country: config.geocoding_country.clone(),
            rate_limit_backoff: config.rate_limit_backoff,
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.rate_limit_backoff = backoff;
        self
    }

    /// Builds the search text: `name [hint] country`.
    pub fn query_for(&self, name: &str, address_hint: Option<&str>) -> String {
        let mut query = name.trim().to_string();
        if let Some(hint) = address_hint.map(str::trim).filter(|h| !h.is_empty()) {
            query.push(' ');
            query.push_str(hint);
        }
        query.push(' ');
        query.push_str(&self.country);
        query
    }
}

//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `MATCHER_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_CANDIDATE_STEP, DEFAULT_COUNTRY, DEFAULT_INITIAL_CANDIDATES, DEFAULT_MAX_CANDIDATES,
    DEFAULT_RATE_LIMIT_BACKOFF_SECS, DEFAULT_REASONING_MODEL, DEFAULT_REGION,
    DEFAULT_SKIP_LIST_PATH,
};

/// Matcher configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MATCHER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. Required by the binary, optional for library use.
    pub database_url: Option<String>,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding company embeddings. Default: `companies`.
    pub collection: String,

    /// Sentence encoder directory (BERT + tokenizer). Stub mode when unset.
    pub embedder_path: Option<PathBuf>,

    /// Cross-encoder directory (BERT + tokenizer). Stub mode when unset.
    pub reranker_path: Option<PathBuf>,

    /// Places API key. Geocoding reports `api_error` when unset.
    pub geocoding_api_key: Option<String>,

    /// Region bias passed to the geocoder. Default: `pt`.
    pub geocoding_region: String,

    /// Country appended to every geocoding query. Default: `Portugal`.
    pub geocoding_country: String,

    /// Sleep applied after a quota rejection. Default: 60 seconds.
    pub rate_limit_backoff: Duration,

    /// Model name passed to the reasoning client. Default: `gpt-5-mini`.
    pub reasoning_model: String,

    pub initial_candidates: usize,
    pub candidate_step: usize,
    pub max_candidates: usize,

    /// Skip-list file. Default: `./data/skipped_incentives.json`.
    pub skip_list_path: PathBuf,

    /// Optional cap for the in-process location cache (unbounded when unset).
    pub location_cache_capacity: Option<u64>,
}

/// Default Qdrant URL used when `MATCHER_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default collection used when `MATCHER_COLLECTION` is not set.
pub const DEFAULT_COLLECTION: &str = "companies";

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            embedder_path: None,
            reranker_path: None,
            geocoding_api_key: None,
            geocoding_region: DEFAULT_REGION.to_string(),
            geocoding_country: DEFAULT_COUNTRY.to_string(),
            rate_limit_backoff: Duration::from_secs(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            initial_candidates: DEFAULT_INITIAL_CANDIDATES,
            candidate_step: DEFAULT_CANDIDATE_STEP,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            skip_list_path: PathBuf::from(DEFAULT_SKIP_LIST_PATH),
            location_cache_capacity: None,
        }
    }
}

impl Config {
    const ENV_DATABASE_URL: &'static str = "MATCHER_DATABASE_URL";
    const ENV_QDRANT_URL: &'static str = "MATCHER_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "MATCHER_COLLECTION";
    const ENV_EMBEDDER_PATH: &'static str = "MATCHER_EMBEDDER_PATH";
    const ENV_RERANKER_PATH: &'static str = "MATCHER_RERANKER_PATH";
    const ENV_GEOCODING_API_KEY: &'static str = "MATCHER_GEOCODING_API_KEY";
    const ENV_GEOCODING_REGION: &'static str = "MATCHER_GEOCODING_REGION";
    const ENV_GEOCODING_COUNTRY: &'static str = "MATCHER_GEOCODING_COUNTRY";
    const ENV_RATE_LIMIT_BACKOFF_SECS: &'static str = "MATCHER_RATE_LIMIT_BACKOFF_SECS";
    const ENV_REASONING_MODEL: &'static str = "MATCHER_REASONING_MODEL";
    const ENV_INITIAL_CANDIDATES: &'static str = "MATCHER_INITIAL_CANDIDATES";
    const ENV_CANDIDATE_STEP: &'static str = "MATCHER_CANDIDATE_STEP";
    const ENV_MAX_CANDIDATES: &'static str = "MATCHER_MAX_CANDIDATES";
    const ENV_SKIP_LIST_PATH: &'static str = "MATCHER_SKIP_LIST_PATH";
    const ENV_LOCATION_CACHE_CAPACITY: &'static str = "MATCHER_LOCATION_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backoff_secs = Self::parse_number_from_env(
            Self::ENV_RATE_LIMIT_BACKOFF_SECS,
            defaults.rate_limit_backoff.as_secs(),
        )?;

        Ok(Self {
            database_url: Self::parse_optional_string_from_env(Self::ENV_DATABASE_URL),
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            collection: Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection),
            embedder_path: Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH),
            reranker_path: Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH),
            geocoding_api_key: Self::parse_optional_string_from_env(Self::ENV_GEOCODING_API_KEY),
            geocoding_region: Self::parse_string_from_env(
                Self::ENV_GEOCODING_REGION,
                defaults.geocoding_region,
            ),
            geocoding_country: Self::parse_string_from_env(
                Self::ENV_GEOCODING_COUNTRY,
                defaults.geocoding_country,
            ),
            rate_limit_backoff: Duration::from_secs(backoff_secs),
            reasoning_model: Self::parse_string_from_env(
                Self::ENV_REASONING_MODEL,
                defaults.reasoning_model,
            ),
            initial_candidates: Self::parse_number_from_env(
                Self::ENV_INITIAL_CANDIDATES,
                defaults.initial_candidates,
            )?,
            candidate_step: Self::parse_number_from_env(
                Self::ENV_CANDIDATE_STEP,
                defaults.candidate_step,
            )?,
            max_candidates: Self::parse_number_from_env(
                Self::ENV_MAX_CANDIDATES,
                defaults.max_candidates,
            )?,
            skip_list_path: Self::parse_path_from_env(
                Self::ENV_SKIP_LIST_PATH,
                defaults.skip_list_path,
            ),
            location_cache_capacity: Self::parse_optional_number_from_env(
                Self::ENV_LOCATION_CACHE_CAPACITY,
            )?,
        })
    }

    /// Validates paths and numeric invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.embedder_path, &self.reranker_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.skip_list_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.skip_list_path.clone(),
            });
        }

        if self.initial_candidates == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_INITIAL_CANDIDATES,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.candidate_step == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CANDIDATE_STEP,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.max_candidates < self.initial_candidates {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_CANDIDATES,
                reason: format!(
                    "must be >= initial candidates ({}), got {}",
                    self.initial_candidates, self.max_candidates
                ),
            });
        }

        if self.location_cache_capacity == Some(0) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_LOCATION_CACHE_CAPACITY,
                reason: "must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the database URL or [`ConfigError::MissingEnvVar`].
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_DATABASE_URL,
            })
    }

    /// Returns the Places API key or [`ConfigError::MissingEnvVar`].
    pub fn require_geocoding_api_key(&self) -> Result<&str, ConfigError> {
        self.geocoding_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_GEOCODING_API_KEY,
            })
    }

    /// Returns the sentence encoder directory or [`ConfigError::MissingEnvVar`].
    ///
    /// Matching against a real index needs the model that built it; the stub encoder is
    /// only for tests.
    pub fn require_embedder_path(&self) -> Result<&Path, ConfigError> {
        self.embedder_path
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_EMBEDDER_PATH,
            })
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(Self::parse_optional_number_from_env(var_name)?.unwrap_or(default))
    }

    fn parse_optional_number_from_env<T>(var_name: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ConfigError::NumberParseError {
                    name: var_name,
                    value,
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }
}

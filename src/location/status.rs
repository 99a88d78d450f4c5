use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a location resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    Success,
    NotFound,
    ApiError,
    RateLimited,
    IncompleteData,
    /// Served from the persistent tier.
    Cached,
    Unknown,
}

impl LocationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Success => "success",
            LocationStatus::NotFound => "not_found",
            LocationStatus::ApiError => "api_error",
            LocationStatus::RateLimited => "rate_limited",
            LocationStatus::IncompleteData => "incomplete_data",
            LocationStatus::Cached => "cached",
            LocationStatus::Unknown => "unknown",
        }
    }

    /// Parses a stored status; anything unrecognised maps to [`LocationStatus::Unknown`].
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "success" => LocationStatus::Success,
            "not_found" => LocationStatus::NotFound,
            "api_error" => LocationStatus::ApiError,
            "rate_limited" => LocationStatus::RateLimited,
            "incomplete_data" => LocationStatus::IncompleteData,
            "cached" => LocationStatus::Cached,
            _ => LocationStatus::Unknown,
        }
    }
}

impl fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

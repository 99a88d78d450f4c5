//! Text-search geocoding capability.
//!
//! [`GooglePlacesGeocoder`] talks to the Places Text Search endpoint; [`MockGeocoder`] is a
//! scripted double for tests.

pub mod config;
pub mod error;
pub mod google;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::GeocodingConfig;
pub use error::GeocodeError;
pub use google::GooglePlacesGeocoder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGeocoder;

use async_trait::async_trait;
use serde::Deserialize;

/// Status reported by the text-search service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum PlaceStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ZERO_RESULTS")]
    ZeroResults,
    #[serde(rename = "OVER_QUERY_LIMIT")]
    OverQueryLimit,
    #[serde(rename = "REQUEST_DENIED")]
    RequestDenied,
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest,
    #[serde(other)]
    Unknown,
}

/// One place returned by a text search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceCandidate {
    pub formatted_address: Option<String>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PlaceCandidate {
    pub fn at(latitude: f64, longitude: f64, formatted_address: impl Into<String>) -> Self {
        Self {
            formatted_address: Some(formatted_address.into()),
            name: None,
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Coordinates, when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Raw outcome of a text search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearch {
    pub status: PlaceStatus,
    pub results: Vec<PlaceCandidate>,
}

impl PlaceSearch {
    pub fn ok(results: Vec<PlaceCandidate>) -> Self {
        Self {
            status: PlaceStatus::Ok,
            results,
        }
    }

    pub fn with_status(status: PlaceStatus) -> Self {
        Self {
            status,
            results: Vec::new(),
        }
    }
}

/// External geocoding service.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Runs a free-text search biased towards `region`.
    async fn text_search(&self, query: &str, region: &str) -> Result<PlaceSearch, GeocodeError>;
}

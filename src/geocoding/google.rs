use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GeocodeError, Geocoder, GeocodingConfig, PlaceCandidate, PlaceSearch, PlaceStatus};

/// Places Text Search client.
#[derive(Debug, Clone)]
pub struct GooglePlacesGeocoder {
    http: reqwest::Client,
    config: GeocodingConfig,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: PlaceStatus,
    #[serde(default)]
    results: Vec<TextSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    formatted_address: Option<String>,
    name: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<TextSearchResult> for PlaceCandidate {
    fn from(result: TextSearchResult) -> Self {
        let location = result.geometry.and_then(|g| g.location);
        PlaceCandidate {
            formatted_address: result.formatted_address,
            name: result.name,
            latitude: location.as_ref().map(|l| l.lat),
            longitude: location.as_ref().map(|l| l.lng),
        }
    }
}

impl GooglePlacesGeocoder {
    /// Fails with [`GeocodeError::MissingApiKey`] when no usable key is configured.
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodeError> {
        if config.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            return Err(GeocodeError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeocodingConfig {
        &self.config
    }
}

#[async_trait]
impl Geocoder for GooglePlacesGeocoder {
    async fn text_search(&self, query: &str, region: &str) -> Result<PlaceSearch, GeocodeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GeocodeError::MissingApiKey)?;

        debug!(query = %query, region = %region, "Places text search");

        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("query", query),
                ("key", api_key),
                ("region", region),
                ("language", self.config.language.as_str()),
                ("type", "establishment"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body: TextSearchResponse = response.json().await?;

        Ok(PlaceSearch {
            status: body.status,
            results: body.results.into_iter().map(PlaceCandidate::from).collect(),
        })
    }
}

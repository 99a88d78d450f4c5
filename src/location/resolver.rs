use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, error, info, instrument, warn};

use super::{LocationCache, LocationRecord, LocationStatus};
use crate::domain::CompanyId;
use crate::geocoding::{GeocodeError, Geocoder, GeocodingConfig, PlaceSearch, PlaceStatus};
use crate::store::LocationStore;

/// Resolves company coordinates through memory, the persistent store, then the geocoder.
pub struct LocationResolver {
    cache: LocationCache,
    store: Arc<dyn LocationStore>,
    geocoder: Arc<dyn Geocoder>,
    config: GeocodingConfig,
    api_calls: AtomicU64,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("cache", &self.cache)
            .field("region", &self.config.region)
            .field("api_calls", &self.api_calls())
            .finish()
    }
}

impl LocationResolver {
    pub fn new(
        cache: LocationCache,
        store: Arc<dyn LocationStore>,
        geocoder: Arc<dyn Geocoder>,
        config: GeocodingConfig,
    ) -> Self {
        Self {
            cache,
            store,
            geocoder,
            config,
            api_calls: AtomicU64::new(0),
        }
    }

    /// Geocoding calls made since construction.
    pub fn api_calls(&self) -> u64 {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    /// Resolves one company. Never fails: problems surface as a non-success status.
    #[instrument(skip(self, name, address_hint))]
    pub async fn resolve(
        &self,
        company_id: CompanyId,
        name: &str,
        address_hint: Option<&str>,
    ) -> LocationRecord {
        if let Some(record) = self.cache.get(company_id) {
            debug!(status = %record.status, "Location served from memory");
            return record;
        }

        match self.store.load_location(company_id).await {
            Ok(Some(stored)) => {
                let record = stored.into_cached();
                debug!(origin = %record.origin_status, "Location served from store");
                self.cache.insert(record.clone());
                return record;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Location store read failed, treating as miss"),
        }

        let record = match self.geocode(company_id, name, address_hint).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Geocoder misconfigured, location left unresolved");
                return LocationRecord::unresolved(company_id, LocationStatus::ApiError);
            }
        };

        self.cache.insert(record.clone());
        if let Err(e) = self.store.save_location(&record).await {
            warn!(error = %e, status = %record.status, "Failed to persist location");
        }

        record
    }

    async fn geocode(
        &self,
        company_id: CompanyId,
        name: &str,
        address_hint: Option<&str>,
    ) -> Result<LocationRecord, GeocodeError> {
        let query = self.config.query_for(name, address_hint);
        self.api_calls.fetch_add(1, Ordering::Relaxed);

        let search = match self.geocoder.text_search(&query, &self.config.region).await {
            Ok(search) => search,
            Err(e) if e.is_configuration() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Geocoding request failed");
                return Ok(LocationRecord::unresolved(
                    company_id,
                    LocationStatus::ApiError,
                ));
            }
        };

        let record = match search.status {
            PlaceStatus::Ok => Self::classify_match(company_id, name, search),
            PlaceStatus::ZeroResults => {
                debug!(query = %query, "No places matched");
                LocationRecord::unresolved(company_id, LocationStatus::NotFound)
            }
            PlaceStatus::OverQueryLimit => {
                warn!(
                    backoff_secs = self.config.rate_limit_backoff.as_secs_f64(),
                    "Geocoding quota exceeded, backing off"
                );
                tokio::time::sleep(self.config.rate_limit_backoff).await;
                LocationRecord::unresolved(company_id, LocationStatus::RateLimited)
            }
            other => {
                warn!(status = ?other, "Geocoding service rejected the request");
                LocationRecord::unresolved(company_id, LocationStatus::ApiError)
            }
        };
        Ok(record)
    }

    fn classify_match(company_id: CompanyId, name: &str, search: PlaceSearch) -> LocationRecord {
        let Some(place) = search.results.into_iter().next() else {
            return LocationRecord::unresolved(company_id, LocationStatus::NotFound);
        };

        let Some((latitude, longitude)) = place.coordinates() else {
            return LocationRecord::unresolved(company_id, LocationStatus::IncompleteData);
        };

        let address = place
            .formatted_address
            .or(place.name)
            .unwrap_or_else(|| name.to_string());

        info!(%address, "Location resolved");
        LocationRecord::resolved(company_id, latitude, longitude, address)
    }
}

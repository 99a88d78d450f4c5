use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LocationStatus;
use crate::domain::CompanyId;

/// Resolved (or failed) location for one company.
///
/// `origin_status` is the status the record was produced with. It differs from `status` only
/// for records read back from the persistent tier, which report [`LocationStatus::Cached`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub company_id: CompanyId,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub status: LocationStatus,
    pub origin_status: LocationStatus,
    pub updated_at: DateTime<Utc>,
}

impl LocationRecord {
    pub fn resolved(
        company_id: CompanyId,
        latitude: f64,
        longitude: f64,
        formatted_address: impl Into<String>,
    ) -> Self {
        Self {
            company_id,
            latitude: Some(latitude),
            longitude: Some(longitude),
            formatted_address: Some(formatted_address.into()),
            status: LocationStatus::Success,
            origin_status: LocationStatus::Success,
            updated_at: Utc::now(),
        }
    }

    pub fn unresolved(company_id: CompanyId, status: LocationStatus) -> Self {
        Self {
            company_id,
            latitude: None,
            longitude: None,
            formatted_address: None,
            status,
            origin_status: status,
            updated_at: Utc::now(),
        }
    }

    /// Marks the record as served from the persistent tier.
    pub fn into_cached(mut self) -> Self {
        self.status = LocationStatus::Cached;
        self
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn address(&self) -> Option<&str> {
        self.formatted_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// True for fresh successes and cached successes that still carry coordinates and an
    /// address. Everything else is excluded from eligibility reasoning.
    pub fn is_trusted(&self) -> bool {
        let status_ok = match self.status {
            LocationStatus::Success => true,
            LocationStatus::Cached => self.origin_status == LocationStatus::Success,
            _ => false,
        };

        status_ok && self.coordinates().is_some() && self.address().is_some()
    }
}

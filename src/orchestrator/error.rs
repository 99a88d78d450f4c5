use thiserror::Error;

use crate::domain::IncentiveId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid match configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("incentive {incentive_id} has no geographic requirement")]
    MissingGeoRequirement { incentive_id: IncentiveId },

    #[error("failed to load companies: {0}")]
    CompanyLookup(#[source] StoreError),

    #[error("failed to persist match result: {0}")]
    Persistence(#[source] StoreError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

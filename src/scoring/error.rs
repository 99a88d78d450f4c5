use thiserror::Error;

use crate::domain::CompanyId;
use crate::reasoning::ReasoningError;

/// Reasons a delegated score combination is rejected.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("reasoning error: {0}")]
    Reasoning(#[from] ReasoningError),

    #[error("no score returned for company {company_id}")]
    MissingScore { company_id: CompanyId },

    #[error("score for company {company_id} is not a number")]
    NotNumeric { company_id: CompanyId },

    #[error("score {value} for company {company_id} is outside [0, 1]")]
    OutOfRange { company_id: CompanyId, value: f64 },
}

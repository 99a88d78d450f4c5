//! Persistent collaborators: companies, locations, incentives and match results.
//!
//! Every seam is an `async_trait` so the orchestrator and batch driver hold
//! `Arc<dyn …>` handles. [`PgStore`] implements all four against PostgreSQL;
//! [`MemoryStore`] is the in-memory double.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod memory;
pub mod model;
pub mod postgres;
pub mod reverse_index;


pub use error::StoreError;
#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryStore;
pub use model::{MatchResult, ProgressReport, RankedCompany, ReverseIndexEntry, ScoredRanking};
pub use postgres::PgStore;
pub use reverse_index::{ReverseIndex, build_reverse_index, rebuild_reverse_index};

use async_trait::async_trait;

use crate::domain::{CompanyId, CompanyRecord, Incentive};
use crate::location::LocationRecord;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Loads the requested companies. Unknown ids are omitted; order is unspecified.
    async fn fetch_companies(&self, ids: &[CompanyId]) -> StoreResult<Vec<CompanyRecord>>;
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Returns the stored outcome for a company, or `None` if it was never resolved.
    async fn load_location(&self, company_id: CompanyId) -> StoreResult<Option<LocationRecord>>;

    /// Upserts the outcome keyed by company id.
    async fn save_location(&self, record: &LocationRecord) -> StoreResult<()>;
}

#[async_trait]
pub trait IncentiveStore: Send + Sync {
    async fn fetch_incentive(&self, incentive_id: &str) -> StoreResult<Option<Incentive>>;

    /// Incentives with every matching field present and no non-empty scored result,
    /// ordered by id.
    async fn pending_incentives(&self) -> StoreResult<Vec<Incentive>>;

    async fn progress(&self) -> StoreResult<ProgressReport>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Writes both rankings for an incentive, replacing any previous result.
    async fn save_match(&self, result: &MatchResult) -> StoreResult<()>;

    /// Every persisted score-ordered ranking, ordered by incentive id.
    async fn scored_rankings(&self) -> StoreResult<Vec<ScoredRanking>>;

    /// Replaces the company-side reverse index wholesale.
    async fn replace_reverse_index(&self, index: &ReverseIndex) -> StoreResult<()>;
}

//! Incentive matcher library crate (used by the `matcher` binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`MatchingOrchestrator`], [`MatchConfig`] - iterative search for one incentive
//! - [`BatchRunner`], [`BatchOptions`], [`SkipList`] - sequential driver over pending incentives
//!
//! ## Stages
//! - [`CandidateRetriever`] - query embedding + vector search
//! - [`CandidateReranker`] - cross-encoder reordering with retrieval-order fallback
//! - [`LocationResolver`], [`LocationCache`] - cached geocoding with persisted outcomes
//! - [`GeoEligibilityFilter`] - NUTS II eligibility through the reasoning service
//! - [`CompanyScorer`] - local signals plus delegated final score
//!
//! ## Collaborators
//! Every external system sits behind a trait: [`QueryEmbedder`], [`VectorIndex`],
//! [`RelevanceModel`], [`Geocoder`], [`ReasoningClient`] and the `store` traits.
//!
//! ## Test/Mock Support
//! In-memory doubles are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod batch;
pub mod config;
pub mod constants;
pub mod domain;
pub mod eligibility;
pub mod embedding;
pub mod geocoding;
pub mod location;
pub mod orchestrator;
pub mod reasoning;
pub mod rerank;
pub mod retrieval;
pub mod scoring;
pub mod store;
pub mod vectordb;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchError, BatchOptions, BatchRunner, BatchSummary, SkipList};
pub use config::{Config, ConfigError};
pub use domain::{CandidateCompany, CompanyId, CompanyRecord, Incentive, LocatedCandidate};
pub use eligibility::{EligibilityDecision, GeoEligibilityFilter};
pub use embedding::{
    CrossEncoder, EmbeddingError, EncoderConfig, QueryEmbedder, RerankerConfig, RerankerError,
    SentenceEncoder,
};
pub use geocoding::{GeocodeError, Geocoder, GeocodingConfig, GooglePlacesGeocoder};
pub use location::{LocationCache, LocationRecord, LocationResolver, LocationStatus};
pub use orchestrator::{MatchConfig, MatchOutcome, MatchingOrchestrator, OrchestratorError};
pub use reasoning::{GenaiReasoner, ReasoningClient, ReasoningError};
pub use rerank::{CandidateReranker, RelevanceModel};
pub use retrieval::CandidateRetriever;
pub use scoring::{CompanyScorer, OrgDirection, ScoreComponents, ScoredCompany, ScoringError};
pub use store::{
    CompanyStore, IncentiveStore, LocationStore, MatchResult, PgStore, ProgressReport,
    ResultStore, StoreError,
};
pub use vectordb::{QdrantIndex, SearchHit, VectorDbError, VectorIndex};

#[cfg(any(test, feature = "mock"))]
pub use geocoding::MockGeocoder;
#[cfg(any(test, feature = "mock"))]
pub use reasoning::ScriptedReasoner;
#[cfg(any(test, feature = "mock"))]
pub use store::MemoryStore;
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;

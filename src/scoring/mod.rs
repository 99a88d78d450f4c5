//! Company match scoring.
//!
//! Six signals are computed locally ([`features`]); the weighted combination is delegated to
//! the reasoning service and accepted only when it returns a valid score for every company.
//!
//! ```text
//! FinalScore = 0.50·S + 0.20·M + 0.10·G + 0.15·O′ + 0.05·W
//! ```

mod components;
pub mod error;
pub mod features;
mod prompt;
mod scorer;


pub use components::{OrgDirection, ScoreComponents};
pub use error::ScoringError;
pub use scorer::{CompanyScorer, ScoredCompany};

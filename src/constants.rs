//! Cross-cutting, shared constants.
//!
//! The score weights are the single source of truth for the match formula; the prompt text in
//! [`SCORING_FORMULA`] must stay in sync with them.

/// Number of companies kept per incentive once enough eligible candidates are found.
pub const THRESHOLD_COUNT: usize = 5;

pub const DEFAULT_INITIAL_CANDIDATES: usize = 10;
pub const DEFAULT_CANDIDATE_STEP: usize = 10;
pub const DEFAULT_MAX_CANDIDATES: usize = 50;

/// Incentives kept per company in the reverse index.
pub const REVERSE_INDEX_LIMIT: usize = 5;

/// Activity text is truncated to this many characters in persisted rankings.
pub const ACTIVITY_PREVIEW_CHARS: usize = 200;

pub const WEIGHT_SEMANTIC: f64 = 0.50;
pub const WEIGHT_CATEGORY: f64 = 0.20;
pub const WEIGHT_GEOGRAPHIC: f64 = 0.10;
pub const WEIGHT_ORG_FIT: f64 = 0.15;
pub const WEIGHT_WEBSITE: f64 = 0.05;

pub const SCORING_FORMULA: &str = "0.50S + 0.20M + 0.10G + 0.15O' + 0.05W";

/// Delegated scores further than this from the local formula value are logged.
pub const SCORE_DEVIATION_TOLERANCE: f64 = 0.05;

pub const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 60;

pub const DEFAULT_COUNTRY: &str = "Portugal";
pub const DEFAULT_REGION: &str = "pt";

pub const DEFAULT_REASONING_MODEL: &str = "gpt-5-mini";

pub const DEFAULT_SKIP_LIST_PATH: &str = "./data/skipped_incentives.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total =
            WEIGHT_SEMANTIC + WEIGHT_CATEGORY + WEIGHT_GEOGRAPHIC + WEIGHT_ORG_FIT + WEIGHT_WEBSITE;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_expansion_defaults_are_consistent() {
        assert!(DEFAULT_INITIAL_CANDIDATES <= DEFAULT_MAX_CANDIDATES);
        assert!(DEFAULT_CANDIDATE_STEP > 0);
        assert!(THRESHOLD_COUNT <= DEFAULT_INITIAL_CANDIDATES);
    }
}

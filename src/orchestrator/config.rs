use crate::config::Config;
use crate::constants::{
    DEFAULT_CANDIDATE_STEP, DEFAULT_INITIAL_CANDIDATES, DEFAULT_MAX_CANDIDATES, THRESHOLD_COUNT,
};

use super::error::OrchestratorError;

/// Expansion parameters of the matching loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub initial_candidates: usize,
    pub candidate_step: usize,
    pub max_candidates: usize,
    /// Eligible companies needed to stop expanding, and the size of the final list.
    pub threshold_count: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            initial_candidates: DEFAULT_INITIAL_CANDIDATES,
            candidate_step: DEFAULT_CANDIDATE_STEP,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            threshold_count: THRESHOLD_COUNT,
        }
    }
}

impl MatchConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            initial_candidates: config.initial_candidates,
            candidate_step: config.candidate_step,
            max_candidates: config.max_candidates,
            threshold_count: THRESHOLD_COUNT,
        }
    }

    pub fn with_initial_candidates(mut self, count: usize) -> Self {
        self.initial_candidates = count;
        self
    }

    pub fn with_candidate_step(mut self, step: usize) -> Self {
        self.candidate_step = step;
        self
    }

    pub fn with_max_candidates(mut self, count: usize) -> Self {
        self.max_candidates = count;
        self
    }

    pub fn with_threshold_count(mut self, count: usize) -> Self {
        self.threshold_count = count;
        self
    }

    pub fn validate(&self) -> Result<(), OrchestratorError> {
        let invalid = |reason: &str| {
            Err(OrchestratorError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.initial_candidates == 0 {
            return invalid("initial_candidates must be at least 1");
        }
        if self.candidate_step == 0 {
            return invalid("candidate_step must be at least 1");
        }
        if self.max_candidates < self.initial_candidates {
            return invalid("max_candidates must be at least initial_candidates");
        }
        if self.threshold_count == 0 {
            return invalid("threshold_count must be at least 1");
        }
        Ok(())
    }

    /// Upper bound on loop iterations: `⌈(max − initial) / step⌉ + 1`.
    pub fn max_iterations(&self) -> usize {
        (self.max_candidates - self.initial_candidates).div_ceil(self.candidate_step) + 1
    }

    /// Next search size, clamped to `max_candidates`.
    pub fn next_step(&self, candidates_to_try: usize) -> usize {
        candidates_to_try
            .saturating_add(self.candidate_step)
            .min(self.max_candidates)
    }
}

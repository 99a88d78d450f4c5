use crate::domain::LocatedCandidate;
use crate::eligibility::EligibilityDecision;
use crate::store::MatchResult;

/// Everything one search iteration produced.
#[derive(Debug, Clone, Default)]
pub struct Iteration {
    /// Search size requested from the index.
    pub candidates_to_try: usize,
    /// Reranked candidates with their locations.
    pub located: Vec<LocatedCandidate>,
    pub eligibility: EligibilityDecision,
}

impl Iteration {
    /// Eligible candidates in rerank order.
    pub fn eligible(&self) -> Vec<LocatedCandidate> {
        self.located
            .iter()
            .filter(|c| self.eligibility.is_eligible(c.id()))
            .cloned()
            .collect()
    }
}

/// Matching loop states.
#[derive(Debug)]
pub enum MatchState {
    Searching { candidates_to_try: usize },
    Expanding { from: usize },
    /// `selected` holds the final companies in rerank order.
    Finalizing {
        iteration: Iteration,
        selected: Vec<LocatedCandidate>,
    },
    Done { result: MatchResult },
}

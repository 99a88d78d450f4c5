//! Order-preserving reranking with a degraded fallback.
//!
//! When no model is configured or scoring fails, candidates keep their retrieval order and
//! their retrieval score stands in for the rerank score.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::CandidateCompany;
use crate::embedding::RerankerError;

/// Scores documents against a query, one score per document in input order.
pub trait RelevanceModel: Send + Sync {
    fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError>;
}

pub struct CandidateReranker {
    model: Option<Arc<dyn RelevanceModel>>,
}

impl CandidateReranker {
    pub fn new(model: Option<Arc<dyn RelevanceModel>>) -> Self {
        Self { model }
    }

    /// Reranker that always keeps retrieval order.
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn rerank(
        &self,
        query: &str,
        mut candidates: Vec<CandidateCompany>,
    ) -> Vec<CandidateCompany> {
        let Some(model) = &self.model else {
            debug!("Reranker unavailable, keeping retrieval order");
            return Self::fallback(candidates);
        };
        if candidates.is_empty() {
            return candidates;
        }

        let documents: Vec<String> = candidates.iter().map(CandidateCompany::document).collect();

        let scores = match model.score(query, &documents) {
            Ok(scores) if scores.len() == candidates.len() => scores,
            Ok(scores) => {
                warn!(
                    expected = candidates.len(),
                    actual = scores.len(),
                    "Reranker returned a mismatched score count, keeping retrieval order"
                );
                return Self::fallback(candidates);
            }
            Err(e) => {
                warn!(error = %e, "Reranking failed, keeping retrieval order");
                return Self::fallback(candidates);
            }
        };

        for (candidate, score) in candidates.iter_mut().zip(scores) {
            candidate.rerank_score = score;
        }
        candidates.sort_by(|a, b| b.rerank_score.total_cmp(&a.rerank_score));

        debug!(
            top_score = candidates.first().map(|c| c.rerank_score),
            "Reranking complete"
        );
        candidates
    }

    fn fallback(mut candidates: Vec<CandidateCompany>) -> Vec<CandidateCompany> {
        for candidate in &mut candidates {
            candidate.rerank_score = candidate.retrieval_score;
        }
        candidates
    }
}

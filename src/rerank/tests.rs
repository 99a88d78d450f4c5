use std::sync::Arc;

use super::*;
use crate::embedding::CrossEncoder;
use crate::test_support::candidate;

struct FixedScores(Result<Vec<f32>, ()>);

impl RelevanceModel for FixedScores {
    fn score(&self, _query: &str, _documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        self.0.clone().map_err(|_| RerankerError::InferenceFailed {
            reason: "scripted failure".to_string(),
        })
    }
}

fn candidates() -> Vec<CandidateCompany> {
    vec![
        candidate(1, "Alfa Lda", 0.9),
        candidate(2, "Beta Lda", 0.8),
        candidate(3, "Gama Lda", 0.7),
    ]
}

fn ids(candidates: &[CandidateCompany]) -> Vec<i64> {
    candidates.iter().map(CandidateCompany::id).collect()
}

#[test]
fn test_rerank_sorts_by_model_score() {
    let reranker = CandidateReranker::new(Some(Arc::new(FixedScores(Ok(vec![0.1, 0.95, 0.5])))));

    let ranked = reranker.rerank("query", candidates());

    assert_eq!(ids(&ranked), vec![2, 3, 1]);
    assert_eq!(ranked[0].rerank_score, 0.95);
    assert_eq!(ranked[0].retrieval_score, 0.8);
}

#[test]
fn test_ties_keep_retrieval_order() {
    let reranker = CandidateReranker::new(Some(Arc::new(FixedScores(Ok(vec![0.5, 0.5, 0.6])))));

    assert_eq!(ids(&reranker.rerank("query", candidates())), vec![3, 1, 2]);
}

#[test]
fn test_disabled_keeps_order_and_retrieval_scores() {
    let ranked = CandidateReranker::disabled().rerank("query", candidates());

    assert_eq!(ids(&ranked), vec![1, 2, 3]);
    assert!(ranked.iter().all(|c| c.rerank_score == c.retrieval_score));
}

#[test]
fn test_model_failure_falls_back() {
    let reranker = CandidateReranker::new(Some(Arc::new(FixedScores(Err(())))));

    let ranked = reranker.rerank("query", candidates());

    assert_eq!(ids(&ranked), vec![1, 2, 3]);
    assert_eq!(ranked[2].rerank_score, 0.7);
}

#[test]
fn test_mismatched_score_count_falls_back() {
    let reranker = CandidateReranker::new(Some(Arc::new(FixedScores(Ok(vec![0.99])))));

    let ranked = reranker.rerank("query", candidates());

    assert_eq!(ids(&ranked), vec![1, 2, 3]);
    assert_eq!(ranked[0].rerank_score, 0.9);
}

#[test]
fn test_cross_encoder_stub_as_model() {
    let model = CrossEncoder::stub().unwrap();
    let reranker = CandidateReranker::new(Some(Arc::new(model)));
    assert!(reranker.is_enabled());

    let mut pool = candidates();
    pool.push(crate::domain::CandidateCompany::new(
        crate::domain::CompanyRecord::new(4, "Hotel Rural")
            .with_category("Alojamento turístico")
            .with_activity("turismo rural e alojamento"),
        0.1,
    ));

    let ranked = reranker.rerank("turismo rural alojamento", pool);

    assert_eq!(ranked[0].id(), 4);
    assert!(ranked.iter().all(|c| (0.0..=1.0).contains(&c.rerank_score)));
}

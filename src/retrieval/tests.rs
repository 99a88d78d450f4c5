use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::embedding::{EmbeddingError, SentenceEncoder};
use crate::vectordb::MockVectorIndex;

struct FailingEmbedder;

impl QueryEmbedder for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::InferenceFailed {
            reason: "boom".to_string(),
        })
    }
}

fn retriever(index: &Arc<MockVectorIndex>) -> CandidateRetriever {
    let encoder = SentenceEncoder::stub().unwrap();
    CandidateRetriever::new(Arc::new(encoder), index.clone(), "companies")
}

#[tokio::test]
async fn test_retrieve_returns_descending_hits() {
    let index = Arc::new(
        MockVectorIndex::new().with_ranking("companies", vec![(1, 0.3), (2, 0.9), (3, 0.6)]),
    );

    let hits = retriever(&index).retrieve("mobiliário", 2).await;

    let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(index.requested_limits(), vec![2]);
}

#[tokio::test]
async fn test_retrieve_with_stub_vectors() {
    let encoder = SentenceEncoder::stub().unwrap();
    let query_vector = encoder.embed("turismo").unwrap();
    let other_vector = encoder.embed("metalomecânica").unwrap();

    let index = Arc::new(MockVectorIndex::new());
    index.insert("companies", 7, query_vector, HashMap::new());
    index.insert("companies", 8, other_vector, HashMap::new());

    let hits = retriever(&index).retrieve("turismo", 5).await;

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, 7);
    assert!((hits[0].score - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_unavailable_index_yields_empty_list() {
    let index = Arc::new(MockVectorIndex::new().with_ranking("companies", vec![(1, 0.5)]));
    index.set_unavailable(true);

    assert!(retriever(&index).retrieve("turismo", 10).await.is_empty());
}

#[tokio::test]
async fn test_embedding_failure_yields_empty_list() {
    let index = Arc::new(MockVectorIndex::new().with_ranking("companies", vec![(1, 0.5)]));
    let retriever = CandidateRetriever::new(Arc::new(FailingEmbedder), index.clone(), "companies");

    assert!(retriever.retrieve("turismo", 10).await.is_empty());
    assert_eq!(index.search_count(), 0);
}

#[tokio::test]
async fn test_zero_count_or_blank_query_skips_search() {
    let index = Arc::new(MockVectorIndex::new().with_ranking("companies", vec![(1, 0.5)]));
    let retriever = retriever(&index);

    assert!(retriever.retrieve("turismo", 0).await.is_empty());
    assert!(retriever.retrieve("   ", 10).await.is_empty());
    assert_eq!(index.search_count(), 0);
}

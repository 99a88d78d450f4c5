use std::collections::HashMap;

use qdrant_client::qdrant::{PointId, ScoredPoint};

use super::*;

const COLLECTION: &str = "companies";

#[test]
fn test_cosine_similarity() {
    assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
}

#[test]
fn test_hit_from_scored_point_keeps_string_payload() {
    let mut payload = HashMap::new();
    payload.insert("company_name".to_string(), "Padaria Lda".into());
    payload.insert("employees".to_string(), 12_i64.into());

    let point = ScoredPoint {
        id: Some(PointId::from(42_u64)),
        payload,
        score: 0.87,
        ..Default::default()
    };

    let hit = SearchHit::from_scored_point(point).unwrap();
    assert_eq!(hit.id, 42);
    assert_eq!(hit.score, 0.87);
    assert_eq!(hit.attributes.get("company_name").map(String::as_str), Some("Padaria Lda"));
    assert!(!hit.attributes.contains_key("employees"));
}

#[test]
fn test_hit_without_numeric_id_is_dropped() {
    let point = ScoredPoint {
        id: Some(PointId::from("6a1f0c1e-5b8f-4c7e-9d2e-1f0a9b8c7d6e".to_string())),
        score: 0.5,
        ..Default::default()
    };
    assert!(SearchHit::from_scored_point(point).is_none());
}

#[tokio::test]
async fn test_mock_cosine_search_orders_and_limits() {
    let index = MockVectorIndex::new();
    index.insert(COLLECTION, 1, vec![1.0, 0.0], HashMap::new());
    index.insert(COLLECTION, 2, vec![0.7, 0.7], HashMap::new());
    index.insert(COLLECTION, 3, vec![0.0, 1.0], HashMap::new());

    let hits = index.search(COLLECTION, vec![1.0, 0.1], 2).await.unwrap();

    let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(index.requested_limits(), vec![2]);
}

#[tokio::test]
async fn test_mock_fixed_ranking() {
    let index = MockVectorIndex::new().with_ranking(COLLECTION, vec![(5, 0.2), (6, 0.9)]);

    let hits = index.search(COLLECTION, vec![0.0; 4], 10).await.unwrap();

    assert_eq!(hits[0].id, 6);
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_mock_errors() {
    let index = MockVectorIndex::new();
    index.insert(COLLECTION, 1, vec![1.0, 0.0], HashMap::new());

    assert!(matches!(
        index.search("missing", vec![1.0, 0.0], 5).await,
        Err(VectorDbError::CollectionNotFound { .. })
    ));
    assert!(matches!(
        index.search(COLLECTION, vec![1.0, 0.0, 0.0], 5).await,
        Err(VectorDbError::InvalidDimension { .. })
    ));

    index.set_unavailable(true);
    assert!(matches!(
        index.search(COLLECTION, vec![1.0, 0.0], 5).await,
        Err(VectorDbError::SearchFailed { .. })
    ));
    assert_eq!(index.search_count(), 3);
}

#[test]
fn test_check_dimension() {
    assert!(check_dimension(COLLECTION, 384, Some(384)).is_ok());
    assert!(matches!(
        check_dimension(COLLECTION, 384, Some(768)),
        Err(VectorDbError::InvalidDimension {
            expected: 384,
            actual: 768
        })
    ));
    assert!(matches!(
        check_dimension(COLLECTION, 384, None),
        Err(VectorDbError::UnknownDimension { .. })
    ));
}

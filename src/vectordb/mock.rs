use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{SearchHit, VectorDbError, VectorIndex};
use crate::domain::CompanyId;

#[derive(Debug, Clone)]
struct MockPoint {
    id: CompanyId,
    vector: Vec<f32>,
    attributes: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct MockCollection {
    points: Vec<MockPoint>,
    /// Fixed ranking returned regardless of the query vector.
    ranking: Option<Vec<(CompanyId, f32)>>,
}

/// In-memory [`VectorIndex`] with cosine search or a fixed ranking per collection.
#[derive(Debug, Default)]
pub struct MockVectorIndex {
    collections: RwLock<HashMap<String, MockCollection>>,
    unavailable: RwLock<bool>,
    limits: RwLock<Vec<u64>>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        collection: &str,
        id: CompanyId,
        vector: Vec<f32>,
        attributes: HashMap<String, String>,
    ) {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .points
            .push(MockPoint {
                id,
                vector,
                attributes,
            });
    }

    /// Every search on `collection` returns a prefix of `ranking`, sorted by score.
    pub fn with_ranking(self, collection: &str, ranking: Vec<(CompanyId, f32)>) -> Self {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .ranking = Some(ranking);
        self
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    /// Limits requested so far, in call order.
    pub fn requested_limits(&self) -> Vec<u64> {
        self.limits.read().clone()
    }

    pub fn search_count(&self) -> usize {
        self.limits.read().len()
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        self.limits.write().push(limit);

        if *self.unavailable.read() {
            return Err(VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "index unavailable".to_string(),
            });
        }

        let collections = self.collections.read();
        let stored = collections
            .get(collection)
            .ok_or_else(|| VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        let mut hits: Vec<SearchHit> = match &stored.ranking {
            Some(ranking) => ranking
                .iter()
                .map(|(id, score)| SearchHit::new(*id, *score))
                .collect(),
            None => stored
                .points
                .iter()
                .map(|point| {
                    if point.vector.len() != vector.len() {
                        return Err(VectorDbError::InvalidDimension {
                            expected: point.vector.len(),
                            actual: vector.len(),
                        });
                    }
                    Ok(SearchHit {
                        id: point.id,
                        score: cosine_similarity(&vector, &point.vector),
                        attributes: point.attributes.clone(),
                    })
                })
                .collect::<Result<_, _>>()?,
        };

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(hits)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

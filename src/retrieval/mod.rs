//! Candidate retrieval: embed the incentive text and search the company index.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::embedding::QueryEmbedder;
use crate::vectordb::{SearchHit, VectorIndex};

pub struct CandidateRetriever {
    embedder: Arc<dyn QueryEmbedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
}

impl CandidateRetriever {
    pub fn new(
        embedder: Arc<dyn QueryEmbedder>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Up to `count` hits by descending score. Any failure yields an empty list.
    #[instrument(skip(self, query), fields(collection = %self.collection))]
    pub async fn retrieve(&self, query: &str, count: usize) -> Vec<SearchHit> {
        if count == 0 || query.trim().is_empty() {
            return Vec::new();
        }

        let vector = match self.embedder.embed(query) {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Query embedding failed, retrieval skipped");
                return Vec::new();
            }
        };

        let limit = u64::try_from(count).unwrap_or(u64::MAX);
        match self.index.search(&self.collection, vector, limit).await {
            Ok(mut hits) => {
                hits.sort_by(|a, b| b.score.total_cmp(&a.score));
                hits.truncate(count);
                debug!(hits = hits.len(), "Retrieved candidates");
                hits
            }
            Err(e) => {
                warn!(error = %e, "Vector search failed, retrieval skipped");
                Vec::new()
            }
        }
    }
}

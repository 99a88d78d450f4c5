use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{SearchPointsBuilder, vectors_config};
use tracing::debug;

use super::error::VectorDbError;
use super::model::SearchHit;
use super::{VectorIndex, check_dimension};

/// Qdrant-backed [`VectorIndex`].
#[derive(Clone)]
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
}

impl std::fmt::Debug for QdrantIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantIndex").field("url", &self.url).finish()
    }
}

impl QdrantIndex {
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool, VectorDbError> {
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })
    }

    /// Vector size of `collection`, if it holds exactly one vector per point.
    pub async fn vector_size(&self, collection: &str) -> Result<Option<u64>, VectorDbError> {
        let response = self.client.collection_info(collection).await.map_err(|e| {
            VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(response
            .result
            .and_then(|info| info.config)
            .and_then(|config| config.params)
            .and_then(|params| params.vectors_config)
            .and_then(|vectors| vectors.config)
            .and_then(|config| match config {
                vectors_config::Config::Params(params) => Some(params.size),
                vectors_config::Config::ParamsMap(named) if named.map.len() == 1 => {
                    named.map.into_values().next().map(|params| params.size)
                }
                vectors_config::Config::ParamsMap(_) => None,
            }))
    }

    /// Fails unless `collection` exists and stores vectors of `expected` dimensions.
    pub async fn ensure_compatible(
        &self,
        collection: &str,
        expected: usize,
    ) -> Result<(), VectorDbError> {
        if !self.collection_exists(collection).await? {
            return Err(VectorDbError::CollectionNotFound {
                collection: collection.to_string(),
            });
        }
        let size = self.vector_size(collection).await?;
        check_dimension(collection, expected, size)?;
        debug!(collection, dimension = expected, "Collection matches encoder");
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError> {
        let request = SearchPointsBuilder::new(collection, vector, limit).with_payload(true);

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let mut hits: Vec<SearchHit> = response
            .result
            .into_iter()
            .filter_map(SearchHit::from_scored_point)
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(collection, hits = hits.len(), "Vector search complete");
        Ok(hits)
    }
}

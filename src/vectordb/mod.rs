//! Qdrant vector index of companies.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::QdrantIndex;
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, cosine_similarity};
pub use model::SearchHit;

use async_trait::async_trait;

/// Nearest-neighbour search over a named collection.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns up to `limit` hits, highest score first.
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<SearchHit>, VectorDbError>;
}

/// Checks that a collection's vector size matches the query encoder.
pub fn check_dimension(
    collection: &str,
    expected: usize,
    actual: Option<u64>,
) -> Result<(), VectorDbError> {
    match actual {
        Some(size) if size == expected as u64 => Ok(()),
        Some(size) => Err(VectorDbError::InvalidDimension {
            expected,
            actual: size as usize,
        }),
        None => Err(VectorDbError::UnknownDimension {
            collection: collection.to_string(),
        }),
    }
}

//! Model-backed text scoring.
//!
//! - [`encoder`] turns incentive text into query vectors for the company index.
//! - [`reranker`] scores (query, company document) pairs with a cross-encoder.

/// BERT networks shared by both models.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
pub mod encoder;
mod error;
pub mod reranker;
/// Tokenizer loading and vector helpers.
pub mod utils;

pub use encoder::{EncoderConfig, SentenceEncoder};
pub use error::EmbeddingError;
pub use reranker::{CrossEncoder, RerankerConfig, RerankerError};

/// Embeds query text into the vector space of the company index.
pub trait QueryEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

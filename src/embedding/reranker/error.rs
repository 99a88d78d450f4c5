use thiserror::Error;

use crate::embedding::error::EmbeddingError;

/// Failures of the cross-encoder that reorders retrieved companies.
#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("cannot load cross-encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("cross-encoder scoring failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("cannot tokenize query/company pair: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid reranker settings: {reason}")]
    InvalidConfig { reason: String },

    /// Device selection is shared with the sentence encoder.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}

impl From<candle_core::Error> for RerankerError {
    fn from(err: candle_core::Error) -> Self {
        RerankerError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

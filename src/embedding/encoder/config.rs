use std::path::PathBuf;

use crate::config::Config;
use crate::embedding::error::EmbeddingError;

/// Output dimension of the MiniLM-class encoders the company index is built with.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Configuration for [`SentenceEncoder`](super::SentenceEncoder).
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Model directory (`config.json`, `model.safetensors`, `tokenizer.json`). `None` selects
    /// the deterministic stub.
    pub model_path: Option<PathBuf>,
    pub embedding_dim: usize,
    pub max_seq_len: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl EncoderConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Stub mode: no model files, hash-seeded vectors.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            model_path: config.embedder_path.clone(),
            ..Default::default()
        }
    }

    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than 0".to_string(),
            });
        }
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than 0".to_string(),
            });
        }

        if let Some(path) = &self.model_path {
            for file in ["config.json", "model.safetensors", "tokenizer.json"] {
                if !path.join(file).exists() {
                    return Err(EmbeddingError::ModelNotFound {
                        path: path.join(file),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }
}

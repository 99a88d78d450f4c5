//! Query embedding with a BERT-family sentence encoder.
//!
//! The index is populated offline with the same model; vectors from a different model are
//! not comparable. Use [`EncoderConfig::stub`] for tests without model files.

pub mod config;


pub use config::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, EncoderConfig};

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use super::QueryEmbedder;
use super::bert::BertSentenceEncoder;
use super::device::select_device;
use super::error::EmbeddingError;
use super::utils::{l2_normalize, load_tokenizer_with_truncation};

enum EncoderBackend {
    Model {
        model: BertSentenceEncoder,
        tokenizer: Box<Tokenizer>,
        device: Device,
    },
    Stub,
}

pub struct SentenceEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for SentenceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({device:?})"),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .finish()
    }
}

impl SentenceEncoder {
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let Some(model_path) = config.model_path.clone() else {
            warn!("No embedder model configured, using stub embeddings");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        };

        let device = select_device()?;
        debug!(?device, "Selected compute device for sentence encoder");

        let model = BertSentenceEncoder::load(&model_path, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT encoder: {e}"),
            }
        })?;

        if model.hidden_size() != config.embedding_dim {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) does not match model hidden_size ({})",
                    config.embedding_dim,
                    model.hidden_size()
                ),
            });
        }

        let tokenizer =
            load_tokenizer_with_truncation(&model_path, config.max_seq_len).map_err(|e| {
                EmbeddingError::TokenizationFailed {
                    reason: format!("Failed to load tokenizer: {e}"),
                }
            })?;

        info!(
            model_path = %model_path.display(),
            embedding_dim = config.embedding_dim,
            "Sentence encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer: Box::new(tokenizer),
                device,
            },
            config,
        })
    }

    pub fn stub() -> Result<Self, EmbeddingError> {
        Self::load(EncoderConfig::stub())
    }

    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &BertSentenceEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let as_batch = |values: &[u32]| -> Result<Tensor, EmbeddingError> {
            Ok(Tensor::new(values, device)?.unsqueeze(0)?)
        };
        let input_ids = as_batch(encoding.get_ids())?;
        let type_ids = as_batch(encoding.get_type_ids())?;
        let attention_mask = as_batch(encoding.get_attention_mask())?;

        debug!(tokens = encoding.len(), "Encoding query");

        let pooled = model.forward(&input_ids, &type_ids, &attention_mask)?;
        let mut embedding = pooled.squeeze(0)?.to_vec1::<f32>()?;
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding: Vec<f32> = (0..self.config.embedding_dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        l2_normalize(&mut embedding);
        embedding
    }
}

impl QueryEmbedder for SentenceEncoder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }
}

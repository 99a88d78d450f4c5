//! Cross-encoder relevance model.

pub mod config;
pub mod error;

#[cfg(test)]
mod tests;

pub use config::{MAX_SEQ_LEN, RerankerConfig};
pub use error::RerankerError;

use std::collections::HashSet;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::embedding::bert::BertCrossEncoder;
use crate::embedding::device::select_device;
use crate::embedding::utils::{load_tokenizer_with_truncation, sigmoid};
use crate::rerank::RelevanceModel;

const STOP_WORDS: &[&str] = &[
    "a", "as", "o", "os", "de", "da", "das", "do", "dos", "e", "em", "no", "na", "nos", "nas",
    "para", "por", "com", "um", "uma", "ao", "à", "the", "and", "of", "to", "in", "for", "with",
];

pub struct CrossEncoder {
    device: Device,
    config: RerankerConfig,
    model: Option<(BertCrossEncoder, Tokenizer)>,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl CrossEncoder {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        config
            .validate()
            .map_err(|reason| RerankerError::InvalidConfig { reason })?;

        let device = select_device()?;

        let Some(model_path) = config.model_path.clone() else {
            info!("No reranker model path configured, using lexical stub");
            return Ok(Self {
                device,
                config,
                model: None,
            });
        };

        for file in ["config.json", "model.safetensors"] {
            if !model_path.join(file).exists() {
                return Err(RerankerError::ModelLoadFailed {
                    reason: format!("Missing {file} in {}", model_path.display()),
                });
            }
        }

        info!(model_path = %model_path.display(), "Loading reranker model");

        let model = BertCrossEncoder::load(&model_path, &device).map_err(|e| {
            RerankerError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {e}"),
            }
        })?;
        let tokenizer =
            load_tokenizer_with_truncation(&model_path, config.max_seq_len).map_err(|e| {
                RerankerError::ModelLoadFailed {
                    reason: format!("Failed to load tokenizer: {e}"),
                }
            })?;

        Ok(Self {
            device,
            config,
            model: Some((model, tokenizer)),
        })
    }

    pub fn stub() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Relevance of `document` to `query` in [0, 1].
    pub fn score(&self, query: &str, document: &str) -> Result<f32, RerankerError> {
        match &self.model {
            Some((model, tokenizer)) => self.score_with_model(model, tokenizer, query, document),
            None => Ok(placeholder_score(query, document)),
        }
    }

    fn score_with_model(
        &self,
        model: &BertCrossEncoder,
        tokenizer: &Tokenizer,
        query: &str,
        document: &str,
    ) -> Result<f32, RerankerError> {
        let tokens = tokenizer.encode((query, document), true).map_err(|e| {
            RerankerError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let as_batch = |values: &[u32]| -> Result<Tensor, RerankerError> {
            Ok(Tensor::new(values, &self.device)?.unsqueeze(0)?)
        };
        let token_ids = as_batch(tokens.get_ids())?;
        let type_ids = as_batch(tokens.get_type_ids())?;
        let attention_mask = as_batch(tokens.get_attention_mask())?;

        let logits = model.forward(&token_ids, &type_ids, &attention_mask)?;
        let logit = logits
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| RerankerError::InferenceFailed {
                reason: "model returned no logits".to_string(),
            })?;

        Ok(sigmoid(logit))
    }
}

impl RelevanceModel for CrossEncoder {
    fn score(&self, query: &str, documents: &[String]) -> Result<Vec<f32>, RerankerError> {
        debug!(
            documents = documents.len(),
            model_loaded = self.is_model_loaded(),
            "Scoring documents"
        );
        documents
            .iter()
            .map(|document| CrossEncoder::score(self, query, document))
            .collect()
    }
}

/// Lexical overlap mapped through a sigmoid, for running without model files.
fn placeholder_score(query: &str, document: &str) -> f32 {
    let words = |text: &str| -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
            .map(str::to_string)
            .collect()
    };

    let query_words = words(query);
    let document_words = words(document);
    if query_words.is_empty() {
        return 0.0;
    }

    let matches = query_words.intersection(&document_words).count();
    let recall = matches as f32 / query_words.len() as f32;
    let union = query_words.union(&document_words).count().max(1);
    let jaccard = matches as f32 / union as f32;

    sigmoid(8.0 * (0.6 * recall + 0.4 * jaccard - 0.5))
}

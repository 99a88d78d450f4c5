use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReasoningError {
    #[error("reasoning request to '{model}' failed: {message}")]
    RequestFailed { model: String, message: String },

    #[error("reasoning service returned an empty reply")]
    EmptyResponse,

    #[error("no JSON object found in reasoning reply")]
    NoJsonObject,

    #[error("reasoning reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode or decode stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("incentive not found: {incentive_id}")]
    IncentiveNotFound { incentive_id: String },

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

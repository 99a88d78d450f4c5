use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to access skip-list at {path}: {source}")]
    SkipListIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode skip-list: {0}")]
    SkipListEncode(#[from] serde_json::Error),
}

pub type BatchResult<T> = Result<T, BatchError>;

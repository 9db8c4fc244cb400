use thiserror::Error;

/// Error type returned by [`Verifier`](crate::index::Verifier) implementations.
pub type VerifyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BffError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Verify failed for document {id}: {source}")]
    Verify {
        id: u64,
        #[source]
        source: VerifyError,
    },
}

pub type Result<T> = std::result::Result<T, BffError>;

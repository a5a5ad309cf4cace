use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unrecognized API version: {0}")]
    UnknownVersion(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

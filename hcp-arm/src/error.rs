use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArmError {
    #[error("Invalid resource ID: {0}")]
    InvalidResourceId(String),

    #[error("Invalid system data header: {0}")]
    InvalidSystemData(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

use shared::error::ApiFailure;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach prediction service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("schema endpoint returned status {0}")]
    SchemaStatus(u16),
    #[error("schema payload has an unexpected shape: {0}")]
    InvalidSchema(String),
    /// Displays as the server's own message so it can be shown verbatim.
    #[error(transparent)]
    PredictionRequest(#[from] ApiFailure),
    #[error("response did not contain a prediction")]
    MissingPrediction,
    #[error("prediction worker unavailable: {0}")]
    BackendUnavailable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

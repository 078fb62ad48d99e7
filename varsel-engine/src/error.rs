use thiserror::Error;
use tokio::task::JoinError;

use varsel_config::ConfigError;
use varsel_detection::DetectionError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Event processing error: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DetectionError> for EngineError {
    fn from(err: DetectionError) -> Self {
        EngineError::Validation(err.to_string())
    }
}

impl From<JoinError> for EngineError {
    fn from(err: JoinError) -> Self {
        EngineError::Processing(err.to_string())
    }
}

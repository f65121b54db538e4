use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model load failed: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("invalid artifact config: {reason}")]
    InvalidConfig { reason: String },

    #[error("feature vector has {actual} slots, artifact expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("artifact produced an empty output")]
    EmptyOutput,
}

impl From<candle_core::Error> for ArtifactError {
    fn from(e: candle_core::Error) -> Self {
        ArtifactError::InferenceFailed {
            reason: e.to_string(),
        }
    }
}

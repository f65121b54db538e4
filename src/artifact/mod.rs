//! Opaque scoring artifacts.
//!
//! Every consumer (the cost orchestrator, the ranking engine) depends only
//! on the [`ScoringArtifact`] capability, never on a concrete inference
//! runtime. The production implementation is [`TabularModel`] (candle);
//! [`StubArtifact`] stands in when no assets are configured and in tests.

pub mod device;
pub mod error;
pub mod model;
pub mod stub;


pub use device::select_device;
pub use error::ArtifactError;
pub use model::{ArtifactSpec, OutputKind, TabularModel};
pub use stub::StubArtifact;

#[cfg(any(test, feature = "mock"))]
pub use stub::{FailingArtifact, FixedArtifact};

/// Raw output of one artifact invocation.
///
/// Classifier artifacts exported with a decision head emit a single
/// predicted index; probabilistic heads emit a distribution over the label
/// space. Regression artifacts emit a one-element distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutput {
    /// A single predicted label index.
    PredictedIndex(i64),
    /// A probability (or raw score) per label index.
    Distribution(Vec<f32>),
}

impl ScoreOutput {
    /// Collapses the output to one scalar, the contract of the cost path.
    ///
    /// A distribution yields its first element; a bare index is its value
    /// as a float.
    pub fn scalar(&self) -> Result<f32, ArtifactError> {
        match self {
            ScoreOutput::Distribution(values) => {
                values.first().copied().ok_or(ArtifactError::EmptyOutput)
            }
            ScoreOutput::PredictedIndex(index) => Ok(*index as f32),
        }
    }

    /// Returns `true` for the single-index variant.
    pub fn is_index(&self) -> bool {
        matches!(self, ScoreOutput::PredictedIndex(_))
    }
}

/// Capability of an independently trained scoring artifact: a fixed-length
/// feature vector in, a [`ScoreOutput`] out.
///
/// Implementations are shared read-only across concurrent requests and must
/// be safe to invoke from any thread.
pub trait ScoringArtifact: Send + Sync {
    /// Runs the artifact on one feature vector.
    fn invoke(&self, features: &[f32]) -> Result<ScoreOutput, ArtifactError>;

    /// The fixed input width this artifact was trained on.
    fn input_len(&self) -> usize;
}

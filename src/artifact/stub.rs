//! Deterministic stand-in artifact.
//!
//! Used when the service boots without an assets directory and throughout
//! the test suite. Scores are a pure function of the feature vector, so
//! repeated invocations are byte-identical.

use super::error::ArtifactError;
use super::{ScoreOutput, ScoringArtifact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StubKind {
    Regression,
    Index,
    Distribution,
}

/// A dependency-free [`ScoringArtifact`] with deterministic output.
#[derive(Debug, Clone)]
pub struct StubArtifact {
    input_len: usize,
    output_dim: usize,
    kind: StubKind,
}

impl StubArtifact {
    /// A regression stub emitting one cost-like scalar.
    pub fn regression(input_len: usize) -> Self {
        Self {
            input_len,
            output_dim: 1,
            kind: StubKind::Regression,
        }
    }

    /// A classifier stub emitting a single predicted index in
    /// `0..output_dim`.
    pub fn classifier_index(input_len: usize, output_dim: usize) -> Self {
        Self {
            input_len,
            output_dim,
            kind: StubKind::Index,
        }
    }

    /// A classifier stub emitting a normalized distribution of width
    /// `output_dim`.
    pub fn classifier_distribution(input_len: usize, output_dim: usize) -> Self {
        Self {
            input_len,
            output_dim,
            kind: StubKind::Distribution,
        }
    }

    fn seed(features: &[f32]) -> u64 {
        features
            .iter()
            .fold(0x9e37_79b9_7f4a_7c15u64, |acc, f| {
                acc.rotate_left(7) ^ u64::from(f.to_bits())
            })
    }
}

impl ScoringArtifact for StubArtifact {
    fn invoke(&self, features: &[f32]) -> Result<ScoreOutput, ArtifactError> {
        if features.len() != self.input_len {
            return Err(ArtifactError::ShapeMismatch {
                expected: self.input_len,
                actual: features.len(),
            });
        }

        let seed = Self::seed(features);

        match self.kind {
            StubKind::Regression => {
                let value = (seed % 1_000_000) as f32 / 10.0;
                Ok(ScoreOutput::Distribution(vec![value]))
            }
            StubKind::Index => {
                let index = (seed % self.output_dim as u64) as i64;
                Ok(ScoreOutput::PredictedIndex(index))
            }
            StubKind::Distribution => {
                let weights: Vec<f32> = (0..self.output_dim)
                    .map(|j| ((seed.rotate_left(j as u32 % 63) & 0xFF) as f32) + 1.0)
                    .collect();
                let total: f32 = weights.iter().sum();
                Ok(ScoreOutput::Distribution(
                    weights.into_iter().map(|w| w / total).collect(),
                ))
            }
        }
    }

    fn input_len(&self) -> usize {
        self.input_len
    }
}

/// A fixed-output artifact for exercising specific ranking paths in tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct FixedArtifact {
    input_len: usize,
    output: ScoreOutput,
}

#[cfg(any(test, feature = "mock"))]
impl FixedArtifact {
    pub fn new(input_len: usize, output: ScoreOutput) -> Self {
        Self { input_len, output }
    }
}

#[cfg(any(test, feature = "mock"))]
impl ScoringArtifact for FixedArtifact {
    fn invoke(&self, features: &[f32]) -> Result<ScoreOutput, ArtifactError> {
        if features.len() != self.input_len {
            return Err(ArtifactError::ShapeMismatch {
                expected: self.input_len,
                actual: features.len(),
            });
        }
        Ok(self.output.clone())
    }

    fn input_len(&self) -> usize {
        self.input_len
    }
}

/// An always-failing artifact for exercising isolation paths in tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct FailingArtifact {
    input_len: usize,
}

#[cfg(any(test, feature = "mock"))]
impl FailingArtifact {
    pub fn new(input_len: usize) -> Self {
        Self { input_len }
    }
}

#[cfg(any(test, feature = "mock"))]
impl ScoringArtifact for FailingArtifact {
    fn invoke(&self, _features: &[f32]) -> Result<ScoreOutput, ArtifactError> {
        Err(ArtifactError::InferenceFailed {
            reason: "synthetic failure".to_string(),
        })
    }

    fn input_len(&self) -> usize {
        self.input_len
    }
}

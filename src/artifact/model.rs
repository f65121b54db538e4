//! Candle-backed feed-forward scoring artifact.
//!
//! Each artifact directory holds a `config.json` describing the network and
//! a `model.safetensors` with its weights:
//!
//! ```json
//! {
//!   "input_dim": 7,
//!   "hidden_dims": [64, 32],
//!   "output_dim": 48,
//!   "output": "distribution"
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use serde::Deserialize;
use tracing::info;

use super::error::ArtifactError;
use super::{ScoreOutput, ScoringArtifact};

/// How the final layer's output is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Raw head output, emitted as-is (cost regressors, `output_dim` 1).
    Regression,
    /// Argmax of the head, emitted as a single predicted index.
    Index,
    /// Softmax of the head, emitted as a probability vector.
    Distribution,
}

/// Network description parsed from an artifact's `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactSpec {
    pub input_dim: usize,
    #[serde(default)]
    pub hidden_dims: Vec<usize>,
    pub output_dim: usize,
    pub output: OutputKind,
}

impl ArtifactSpec {
    fn validate(&self) -> Result<(), ArtifactError> {
        if self.input_dim == 0 || self.output_dim == 0 {
            return Err(ArtifactError::InvalidConfig {
                reason: "input_dim and output_dim must be non-zero".to_string(),
            });
        }
        if self.hidden_dims.contains(&0) {
            return Err(ArtifactError::InvalidConfig {
                reason: "hidden_dims must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

struct TabularModelImpl {
    layers: Vec<Linear>,
    head: Linear,
    spec: ArtifactSpec,
    device: Device,
}

impl TabularModelImpl {
    fn load(vb: VarBuilder, spec: ArtifactSpec, device: Device) -> candle_core::Result<Self> {
        let mut layers = Vec::with_capacity(spec.hidden_dims.len());
        let mut in_dim = spec.input_dim;

        for (i, &hidden) in spec.hidden_dims.iter().enumerate() {
            layers.push(candle_nn::linear(
                in_dim,
                hidden,
                vb.pp(format!("layers.{i}")),
            )?);
            in_dim = hidden;
        }

        let head = candle_nn::linear(in_dim, spec.output_dim, vb.pp("head"))?;

        Ok(Self {
            layers,
            head,
            spec,
            device,
        })
    }

    fn forward(&self, features: &[f32]) -> Result<Vec<f32>, ArtifactError> {
        let mut x = Tensor::from_vec(
            features.to_vec(),
            (1, self.spec.input_dim),
            &self.device,
        )?;

        for layer in &self.layers {
            x = layer.forward(&x)?.relu()?;
        }
        let logits = self.head.forward(&x)?;

        let output = match self.spec.output {
            OutputKind::Distribution => candle_nn::ops::softmax(&logits, 1)?,
            OutputKind::Regression | OutputKind::Index => logits,
        };

        Ok(output.flatten_all()?.to_vec1::<f32>()?)
    }
}

/// A loaded scoring artifact (shared, read-only).
#[derive(Clone)]
pub struct TabularModel(Arc<TabularModelImpl>);

impl std::fmt::Debug for TabularModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularModel")
            .field("spec", &self.0.spec)
            .finish()
    }
}

impl TabularModel {
    /// Loads `config.json` + `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self, ArtifactError> {
        let model_dir = model_dir.as_ref();

        let config_path = model_dir.join("config.json");
        if !config_path.exists() {
            return Err(ArtifactError::ModelLoadFailed {
                reason: format!("Missing config.json in {}", model_dir.display()),
            });
        }

        let weights_path = model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(ArtifactError::ModelLoadFailed {
                reason: format!("Missing model.safetensors in {}", model_dir.display()),
            });
        }

        let config_content =
            std::fs::read_to_string(&config_path).map_err(|e| ArtifactError::ModelLoadFailed {
                reason: format!("Failed to read {}: {e}", config_path.display()),
            })?;
        let spec: ArtifactSpec =
            serde_json::from_str(&config_content).map_err(|e| ArtifactError::InvalidConfig {
                reason: format!("Failed to parse {}: {e}", config_path.display()),
            })?;
        spec.validate()?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
                .map_err(|e| ArtifactError::ModelLoadFailed {
                    reason: format!("Failed to map weights: {e}"),
                })?;

        let model = TabularModelImpl::load(vb, spec, device.clone()).map_err(|e| {
            ArtifactError::ModelLoadFailed {
                reason: format!("Failed to build network: {e}"),
            }
        })?;

        info!(
            model_dir = %model_dir.display(),
            input_dim = model.spec.input_dim,
            output_dim = model.spec.output_dim,
            output = ?model.spec.output,
            "loaded scoring artifact"
        );

        Ok(Self(Arc::new(model)))
    }

    /// The parsed network description.
    pub fn spec(&self) -> &ArtifactSpec {
        &self.0.spec
    }
}

impl ScoringArtifact for TabularModel {
    fn invoke(&self, features: &[f32]) -> Result<ScoreOutput, ArtifactError> {
        if features.len() != self.0.spec.input_dim {
            return Err(ArtifactError::ShapeMismatch {
                expected: self.0.spec.input_dim,
                actual: features.len(),
            });
        }

        let values = self.0.forward(features)?;

        match self.0.spec.output {
            OutputKind::Index => {
                let index = values
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(i, _)| i as i64)
                    .ok_or(ArtifactError::EmptyOutput)?;
                Ok(ScoreOutput::PredictedIndex(index))
            }
            OutputKind::Regression | OutputKind::Distribution => {
                if values.is_empty() {
                    return Err(ArtifactError::EmptyOutput);
                }
                Ok(ScoreOutput::Distribution(values))
            }
        }
    }

    fn input_len(&self) -> usize {
        self.0.spec.input_dim
    }
}

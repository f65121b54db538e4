//! Cost fan-out: one feature vector, 13 independently scored cost buckets.
//!
//! Each bucket's artifact is invoked in isolation and keeps its own
//! `Result`; one failing bucket never zeroes the others. The orchestrator's
//! contract stays a raw `f32` per bucket — rounding and clamping happen in
//! [`crate::response`].


use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::artifact::{ArtifactError, ScoringArtifact};
use crate::constants::COST_BUCKET_COUNT;
use crate::encoder::{CostFeatureEncoder, CostRequest};

/// The 13 cost buckets, in artifact-registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBucket {
    NonSurgical,
    Surgical,
    DoctorConsult,
    NursingAction,
    Radiology,
    Laboratory,
    BloodService,
    Rehabilitation,
    Accommodation,
    IntensiveAccommodation,
    Medicine,
    MedicalEquipment,
    TotalCost,
}

impl CostBucket {
    pub const ALL: [CostBucket; COST_BUCKET_COUNT] = [
        CostBucket::NonSurgical,
        CostBucket::Surgical,
        CostBucket::DoctorConsult,
        CostBucket::NursingAction,
        CostBucket::Radiology,
        CostBucket::Laboratory,
        CostBucket::BloodService,
        CostBucket::Rehabilitation,
        CostBucket::Accommodation,
        CostBucket::IntensiveAccommodation,
        CostBucket::Medicine,
        CostBucket::MedicalEquipment,
        CostBucket::TotalCost,
    ];

    /// Stable identifier, also the artifact subdirectory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CostBucket::NonSurgical => "non_surgical",
            CostBucket::Surgical => "surgical",
            CostBucket::DoctorConsult => "doctor_consult",
            CostBucket::NursingAction => "nursing_action",
            CostBucket::Radiology => "radiology",
            CostBucket::Laboratory => "laboratory",
            CostBucket::BloodService => "blood_service",
            CostBucket::Rehabilitation => "rehabilitation",
            CostBucket::Accommodation => "accommodation",
            CostBucket::IntensiveAccommodation => "intensive_accommodation",
            CostBucket::Medicine => "medicine",
            CostBucket::MedicalEquipment => "medical_equipment",
            CostBucket::TotalCost => "total_cost",
        }
    }
}

impl std::fmt::Display for CostBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-bucket scores for one request. Failed buckets keep their error.
#[derive(Debug)]
pub struct CostScores {
    outcomes: Vec<(CostBucket, Result<f32, ArtifactError>)>,
}

impl CostScores {
    pub fn get(&self, bucket: CostBucket) -> Option<&Result<f32, ArtifactError>> {
        self.outcomes
            .iter()
            .find(|(b, _)| *b == bucket)
            .map(|(_, outcome)| outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CostBucket, &Result<f32, ArtifactError>)> {
        self.outcomes.iter().map(|(b, outcome)| (*b, outcome))
    }

    /// Buckets whose artifact failed on this request.
    pub fn failed_buckets(&self) -> Vec<CostBucket> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(b, _)| *b)
            .collect()
    }
}

/// Owns one scoring artifact per [`CostBucket`] and fans a feature vector
/// out to all of them.
pub struct CostOrchestrator {
    artifacts: Vec<(CostBucket, Box<dyn ScoringArtifact>)>,
}

impl std::fmt::Debug for CostOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostOrchestrator")
            .field("buckets", &self.artifacts.len())
            .finish()
    }
}

impl CostOrchestrator {
    /// Builds the orchestrator with one artifact per bucket, in
    /// [`CostBucket::ALL`] order.
    pub fn from_fn(mut make: impl FnMut(CostBucket) -> Box<dyn ScoringArtifact>) -> Self {
        Self {
            artifacts: CostBucket::ALL
                .into_iter()
                .map(|bucket| (bucket, make(bucket)))
                .collect(),
        }
    }

    /// Fallible variant of [`CostOrchestrator::from_fn`] for warm-up paths
    /// that load artifacts from disk.
    pub fn try_from_fn<E>(
        mut make: impl FnMut(CostBucket) -> Result<Box<dyn ScoringArtifact>, E>,
    ) -> Result<Self, E> {
        let mut artifacts = Vec::with_capacity(COST_BUCKET_COUNT);
        for bucket in CostBucket::ALL {
            artifacts.push((bucket, make(bucket)?));
        }
        Ok(Self { artifacts })
    }

    /// Invokes every bucket artifact independently on `features`.
    pub fn score(&self, features: &[f32]) -> CostScores {
        let outcomes = self
            .artifacts
            .iter()
            .map(|(bucket, artifact)| {
                let started = Instant::now();
                let outcome = artifact
                    .invoke(features)
                    .and_then(|output| output.scalar());

                match &outcome {
                    Ok(raw) => debug!(
                        bucket = %bucket,
                        raw = raw,
                        elapsed_us = started.elapsed().as_micros() as u64,
                        "scored cost bucket"
                    ),
                    Err(e) => warn!(bucket = %bucket, error = %e, "cost bucket failed"),
                }

                (*bucket, outcome)
            })
            .collect();

        CostScores { outcomes }
    }
}

/// Cost-path unit held by the gateway: encoder + orchestrator.
#[derive(Debug)]
pub struct CostPredictor {
    encoder: CostFeatureEncoder,
    orchestrator: CostOrchestrator,
}

impl CostPredictor {
    pub fn new(encoder: CostFeatureEncoder, orchestrator: CostOrchestrator) -> Self {
        Self {
            encoder,
            orchestrator,
        }
    }

    pub fn predict(&self, request: &CostRequest) -> CostScores {
        let features = self.encoder.encode(request);
        self.orchestrator.score(&features)
    }
}

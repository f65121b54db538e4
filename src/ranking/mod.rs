//! Two-stage classification ranking.
//!
//! Stage 1 ranks categories from the category artifact's output; stage 2
//! ranks each surviving category's candidate procedures against a single
//! procedure-artifact distribution, restricted by the membership table.
//!
//! The three clinical domains (drug, radiology, laboratory) run the same
//! algorithm over their own artifacts and tables, and fail independently.

pub mod error;
pub mod types;


pub use error::RankingError;
pub use types::{CategoryPrediction, DomainPrediction, ProcedurePrediction};

use std::cmp::Ordering;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, warn};

use crate::artifact::{ScoreOutput, ScoringArtifact};
use crate::constants::{
    MAX_TOP_CATEGORIES, MAX_TOP_PROCEDURES, SENTINEL_PROCEDURE_INDEX, UNKNOWN_LABEL,
};
use crate::encoder::{ClassificationFeatureEncoder, ClassificationRequest};
use crate::tables::{LabelMapping, MembershipTable};

/// The three clinical domains the engine ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Drug,
    Radiology,
    Laboratory,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Drug, Domain::Radiology, Domain::Laboratory];

    /// Stable identifier, also the artifact subdirectory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Drug => "drug",
            Domain::Radiology => "radiology",
            Domain::Laboratory => "laboratory",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one domain needs: its two artifacts and its three tables.
pub struct DomainPipeline {
    domain: Domain,
    category_artifact: Box<dyn ScoringArtifact>,
    procedure_artifact: Box<dyn ScoringArtifact>,
    category_labels: LabelMapping,
    procedure_labels: LabelMapping,
    membership: MembershipTable,
}

impl std::fmt::Debug for DomainPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainPipeline")
            .field("domain", &self.domain)
            .field("categories", &self.category_labels.space_size())
            .field("procedures", &self.procedure_labels.space_size())
            .finish()
    }
}

impl DomainPipeline {
    pub fn new(
        domain: Domain,
        category_artifact: Box<dyn ScoringArtifact>,
        procedure_artifact: Box<dyn ScoringArtifact>,
        category_labels: LabelMapping,
        procedure_labels: LabelMapping,
        membership: MembershipTable,
    ) -> Self {
        Self {
            domain,
            category_artifact,
            procedure_artifact,
            category_labels,
            procedure_labels,
            membership,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Runs both stages for this domain on one feature vector.
    pub fn rank(&self, features: &[f32]) -> Result<DomainPrediction, RankingError> {
        let ranked_categories = self.rank_categories(features)?;
        let procedure_probs = self.procedure_distribution(features)?;

        let top_categories = ranked_categories
            .into_iter()
            .map(|(category_name, probability)| {
                let procedures = self.rank_procedures(&category_name, &procedure_probs);
                CategoryPrediction {
                    category_name,
                    probability,
                    procedures,
                }
            })
            .collect();

        Ok(DomainPrediction { top_categories })
    }

    /// Stage 1: ranked `(label, probability)` pairs, at most
    /// [`MAX_TOP_CATEGORIES`].
    fn rank_categories(&self, features: &[f32]) -> Result<Vec<(String, f32)>, RankingError> {
        let output = self
            .category_artifact
            .invoke(features)
            .map_err(RankingError::CategoryArtifact)?;

        let ranked = match output {
            // Decision-head artifact: exactly one category, probability 1.0.
            ScoreOutput::PredictedIndex(index) => {
                vec![(self.category_label(index), 1.0)]
            }
            ScoreOutput::Distribution(probs) => {
                let mut indexed: Vec<(usize, f32)> = probs.into_iter().enumerate().collect();
                // Probability descending; equal probabilities keep the lower
                // original index first.
                indexed.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(Ordering::Equal)
                        .then(a.0.cmp(&b.0))
                });
                indexed.truncate(MAX_TOP_CATEGORIES);

                indexed
                    .into_iter()
                    .map(|(index, prob)| (self.category_label(index as i64), prob))
                    .collect()
            }
        };

        Ok(ranked)
    }

    /// Stage 2 input: the procedure artifact's distribution, reconstructing
    /// a one-hot vector over the full procedure index space when the
    /// artifact emits a bare index. Label indices may be sparse, so the
    /// vector is sized by the highest index, not the label count.
    fn procedure_distribution(&self, features: &[f32]) -> Result<Vec<f32>, RankingError> {
        let output = self
            .procedure_artifact
            .invoke(features)
            .map_err(RankingError::ProcedureArtifact)?;

        Ok(match output {
            ScoreOutput::Distribution(probs) => probs,
            ScoreOutput::PredictedIndex(index) => {
                let mut probs = vec![0.0; self.procedure_labels.index_space()];
                if let Ok(i) = usize::try_from(index)
                    && i < probs.len()
                {
                    probs[i] = 1.0;
                }
                probs
            }
        })
    }

    /// Stage 2: ranked procedures for one surviving category, at most
    /// [`MAX_TOP_PROCEDURES`], or the `("None", 0.0)` placeholder.
    fn rank_procedures(
        &self,
        category_name: &str,
        procedure_probs: &[f32],
    ) -> Vec<ProcedurePrediction> {
        let Some(candidates) = self.membership.candidates(category_name) else {
            debug!(domain = %self.domain, category = %category_name, "no membership entry");
            return vec![ProcedurePrediction::placeholder()];
        };

        let mut resolved: Vec<ProcedurePrediction> = candidates
            .iter()
            .filter_map(|name| {
                // Unresolvable labels and the reserved index 0 are excluded
                // outright, regardless of their probability.
                let index = self.procedure_labels.index_of(name)?;
                if index == SENTINEL_PROCEDURE_INDEX {
                    return None;
                }
                let probability = procedure_probs.get(index as usize).copied().unwrap_or(0.0);
                Some(ProcedurePrediction::new(name.clone(), probability))
            })
            .collect();

        // Stable sort keeps membership (encounter) order on equal
        // probabilities.
        resolved.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });
        resolved.truncate(MAX_TOP_PROCEDURES);

        if resolved.is_empty() {
            vec![ProcedurePrediction::placeholder()]
        } else {
            resolved
        }
    }

    fn category_label(&self, index: i64) -> String {
        u32::try_from(index)
            .ok()
            .and_then(|i| self.category_labels.label_for(i))
            .unwrap_or(UNKNOWN_LABEL)
            .to_string()
    }
}

/// Per-domain outcomes for one request. Domains fail independently.
#[derive(Debug)]
pub struct ClassificationScores {
    pub drug: Result<DomainPrediction, RankingError>,
    pub radiology: Result<DomainPrediction, RankingError>,
    pub laboratory: Result<DomainPrediction, RankingError>,
}

/// Classification-path unit held by the gateway: encoder + the three
/// domain pipelines.
#[derive(Debug)]
pub struct ClassificationPredictor {
    encoder: ClassificationFeatureEncoder,
    drug: DomainPipeline,
    radiology: DomainPipeline,
    laboratory: DomainPipeline,
}

impl ClassificationPredictor {
    pub fn new(
        encoder: ClassificationFeatureEncoder,
        drug: DomainPipeline,
        radiology: DomainPipeline,
        laboratory: DomainPipeline,
    ) -> Self {
        Self {
            encoder,
            drug,
            radiology,
            laboratory,
        }
    }

    pub fn predict(&self, request: &ClassificationRequest) -> ClassificationScores {
        let features = self.encoder.encode(request);

        ClassificationScores {
            drug: Self::rank_domain(&self.drug, &features),
            radiology: Self::rank_domain(&self.radiology, &features),
            laboratory: Self::rank_domain(&self.laboratory, &features),
        }
    }

    fn rank_domain(
        pipeline: &DomainPipeline,
        features: &[f32],
    ) -> Result<DomainPrediction, RankingError> {
        let started = Instant::now();
        let outcome = pipeline.rank(features);

        match &outcome {
            Ok(prediction) => debug!(
                domain = %pipeline.domain(),
                categories = prediction.top_categories.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "ranked domain"
            ),
            Err(e) => warn!(domain = %pipeline.domain(), error = %e, "domain ranking failed"),
        }

        outcome
    }
}

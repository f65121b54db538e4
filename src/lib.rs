//! Clinicast library crate (used by the server binary and integration
//! tests).
//!
//! Predicts itemized treatment costs and ranks likely drug, radiology and
//! laboratory procedures from admission data (ICD-10 diagnoses,
//! length-of-stay, patient type, referral code).
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CostPredictor`], [`CostBucket`], [`CostScores`] - Itemized cost path
//! - [`ClassificationPredictor`], [`Domain`], [`DomainPipeline`] - Two-stage
//!   procedure ranking path
//! - [`Engine`], [`boot::boot`] - Eager warm-up
//!
//! ## Tables & Encoding
//! - [`EncodingTable`], [`Scaler`], [`LabelMapping`], [`MembershipTable`]
//! - [`CostFeatureEncoder`], [`ClassificationFeatureEncoder`]
//!
//! ## Artifacts
//! - [`ScoringArtifact`] - the capability every scorer implements
//! - [`TabularModel`] - candle-backed production scorer
//! - [`StubArtifact`] - deterministic stand-in (stub boot mode, tests)
//!
//! ## Test/Mock Support
//! Fixed and failing artifacts are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod artifact;
pub mod boot;
pub mod config;
pub mod constants;
pub mod cost;
pub mod encoder;
pub mod gateway;
pub mod ranking;
pub mod response;
pub mod tables;

pub use artifact::{
    ArtifactError, ArtifactSpec, OutputKind, ScoreOutput, ScoringArtifact, StubArtifact,
    TabularModel, select_device,
};
#[cfg(any(test, feature = "mock"))]
pub use artifact::{FailingArtifact, FixedArtifact};

pub use boot::{ArtifactMode, BootError, Engine};
pub use config::{Config, ConfigError};
pub use cost::{CostBucket, CostOrchestrator, CostPredictor, CostScores};
pub use encoder::{
    ClassificationFeatureEncoder, ClassificationRequest, CostFeatureEncoder, CostRequest,
    IcdTables,
};
pub use ranking::{
    CategoryPrediction, ClassificationPredictor, ClassificationScores, Domain, DomainPipeline,
    DomainPrediction, ProcedurePrediction, RankingError,
};
pub use response::{
    ClassificationResponse, CostResponse, DomainSection, shape_classification, shape_cost,
};
pub use tables::{EncodingTable, LabelMapping, MembershipTable, Scaler, TableError};

//! Eager warm-up.
//!
//! With an assets directory configured, every table file and every one of
//! the 19 model directories must load before the server binds; any failure
//! aborts boot. Without one, the engine assembles around empty tables and
//! deterministic stub artifacts so the serving surface stays exercisable.
//!
//! Expected assets layout:
//!
//! ```text
//! assets/
//!   tables/
//!     cost_icd_encodings.json
//!     classification_icd_encodings.json
//!     patient_type_vocab.json
//!     referral_code_vocab.json
//!     length_of_stay_scaler.json
//!     labels/{drug,radiology,laboratory}_{category,procedure}.json
//!     membership/{drug,radiology,laboratory}.json
//!   models/
//!     cost/{bucket}/                      # 13 regression artifacts
//!     classification/{domain}_category/   # 3 classifier artifacts
//!     classification/{domain}_procedure/  # 3 classifier artifacts
//! ```

pub mod error;

#[cfg(test)]
mod tests;

pub use error::BootError;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use candle_core::Device;
use tracing::{info, warn};

use crate::artifact::{ScoringArtifact, StubArtifact, TabularModel, select_device};
use crate::config::Config;
use crate::constants::{CLASSIFICATION_FEATURE_LEN, COST_FEATURE_LEN};
use crate::cost::{CostOrchestrator, CostPredictor};
use crate::encoder::{ClassificationFeatureEncoder, CostFeatureEncoder, IcdTables};
use crate::ranking::{ClassificationPredictor, Domain, DomainPipeline};
use crate::tables::{
    LabelMapping, MembershipTable, TableError, load_membership, load_nested_encoding,
    load_nested_mapping, load_paired_encoding, load_scaler,
};

const TABLES_DIR: &str = "tables";
const MODELS_DIR: &str = "models";
const COST_ICD_FILE: &str = "cost_icd_encodings.json";
const CLASSIFICATION_ICD_FILE: &str = "classification_icd_encodings.json";
const PATIENT_TYPE_FILE: &str = "patient_type_vocab.json";
const REFERRAL_CODE_FILE: &str = "referral_code_vocab.json";
const SCALER_FILE: &str = "length_of_stay_scaler.json";

/// Distribution width of stub classifier artifacts.
const STUB_LABEL_SPACE: usize = 8;

/// Whether the engine is serving real artifacts or deterministic stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactMode {
    Real,
    Stub,
}

impl ArtifactMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactMode::Real => "real",
            ArtifactMode::Stub => "stub",
        }
    }
}

/// The fully warmed prediction engine handed to the gateway.
#[derive(Debug)]
pub struct Engine {
    pub cost: Arc<CostPredictor>,
    pub classification: Arc<ClassificationPredictor>,
    pub mode: ArtifactMode,
}

/// Builds the engine from `config`, loading every asset eagerly.
pub fn boot(config: &Config) -> Result<Engine, BootError> {
    match &config.assets_dir {
        Some(assets_dir) => boot_real(assets_dir),
        None => Ok(boot_stub()),
    }
}

fn boot_real(assets_dir: &Path) -> Result<Engine, BootError> {
    let device = select_device()?;
    let tables_dir = assets_dir.join(TABLES_DIR);
    let models_dir = assets_dir.join(MODELS_DIR);

    let cost_encoder = CostFeatureEncoder::new(load_icd_tables(&tables_dir.join(COST_ICD_FILE))?);
    let cost_orchestrator = CostOrchestrator::try_from_fn(|bucket| {
        let model = load_model(
            models_dir.join("cost").join(bucket.as_str()),
            &device,
            COST_FEATURE_LEN,
        )?;
        Ok::<_, BootError>(Box::new(model) as Box<dyn ScoringArtifact>)
    })?;
    let cost = CostPredictor::new(cost_encoder, cost_orchestrator);

    let classification_encoder = ClassificationFeatureEncoder::new(
        load_icd_tables(&tables_dir.join(CLASSIFICATION_ICD_FILE))?,
        load_paired_encoding(&tables_dir.join(PATIENT_TYPE_FILE), "patient_type")?,
        load_paired_encoding(&tables_dir.join(REFERRAL_CODE_FILE), "referral_code")?,
        load_scaler(&tables_dir.join(SCALER_FILE))?,
    );
    let classification = ClassificationPredictor::new(
        classification_encoder,
        load_pipeline(Domain::Drug, &tables_dir, &models_dir, &device)?,
        load_pipeline(Domain::Radiology, &tables_dir, &models_dir, &device)?,
        load_pipeline(Domain::Laboratory, &tables_dir, &models_dir, &device)?,
    );

    info!(assets_dir = %assets_dir.display(), "engine warm-up complete");

    Ok(Engine {
        cost: Arc::new(cost),
        classification: Arc::new(classification),
        mode: ArtifactMode::Real,
    })
}

fn boot_stub() -> Engine {
    warn!("no assets directory configured, booting in stub mode");

    let cost = CostPredictor::new(
        CostFeatureEncoder::stub(),
        CostOrchestrator::from_fn(|_| Box::new(StubArtifact::regression(COST_FEATURE_LEN))),
    );

    let classification = ClassificationPredictor::new(
        ClassificationFeatureEncoder::stub(),
        stub_pipeline(Domain::Drug),
        stub_pipeline(Domain::Radiology),
        stub_pipeline(Domain::Laboratory),
    );

    Engine {
        cost: Arc::new(cost),
        classification: Arc::new(classification),
        mode: ArtifactMode::Stub,
    }
}

fn stub_pipeline(domain: Domain) -> DomainPipeline {
    DomainPipeline::new(
        domain,
        Box::new(StubArtifact::classifier_distribution(
            CLASSIFICATION_FEATURE_LEN,
            STUB_LABEL_SPACE,
        )),
        Box::new(StubArtifact::classifier_distribution(
            CLASSIFICATION_FEATURE_LEN,
            STUB_LABEL_SPACE,
        )),
        LabelMapping::empty(),
        LabelMapping::empty(),
        MembershipTable::empty(),
    )
}

/// Loads one artifact and validates its trained input width against the
/// encoder's schema, so a mis-exported artifact fails boot instead of
/// failing every request.
fn load_model(
    model_dir: PathBuf,
    device: &Device,
    expected_input: usize,
) -> Result<TabularModel, BootError> {
    let model = TabularModel::load(&model_dir, device)?;
    let actual = model.spec().input_dim;
    if actual != expected_input {
        return Err(BootError::InputWidthMismatch {
            path: model_dir,
            expected: expected_input,
            actual,
        });
    }
    Ok(model)
}

/// Loads the four ICD column tables sharing one encodings file.
fn load_icd_tables(path: &Path) -> Result<IcdTables, TableError> {
    Ok(IcdTables {
        primary: load_nested_encoding(path, "icd_primary")?,
        secondary1: load_nested_encoding(path, "icd_secondary1")?,
        secondary2: load_nested_encoding(path, "icd_secondary2")?,
        secondary3: load_nested_encoding(path, "icd_secondary3")?,
    })
}

fn load_pipeline(
    domain: Domain,
    tables_dir: &Path,
    models_dir: &Path,
    device: &Device,
) -> Result<DomainPipeline, BootError> {
    let labels_dir = tables_dir.join("labels");
    let category_labels = load_nested_mapping(
        &labels_dir.join(format!("{domain}_category.json")),
        "category",
    )?;
    let procedure_labels = load_nested_mapping(
        &labels_dir.join(format!("{domain}_procedure.json")),
        "procedure",
    )?;
    let membership = load_membership(&tables_dir.join("membership").join(format!("{domain}.json")))?;

    let classification_dir = models_dir.join("classification");
    let category_artifact = load_model(
        classification_dir.join(format!("{domain}_category")),
        device,
        CLASSIFICATION_FEATURE_LEN,
    )?;
    let procedure_artifact = load_model(
        classification_dir.join(format!("{domain}_procedure")),
        device,
        CLASSIFICATION_FEATURE_LEN,
    )?;

    Ok(DomainPipeline::new(
        domain,
        Box::new(category_artifact),
        Box::new(procedure_artifact),
        category_labels,
        procedure_labels,
        membership,
    ))
}

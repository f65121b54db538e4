use super::*;
use crate::encoder::{ClassificationRequest, CostRequest};
use crate::tables::TableError;

fn cost_request() -> CostRequest {
    CostRequest {
        icd_primary: "A41.9".to_string(),
        icd_secondary1: "J96.0".to_string(),
        icd_secondary2: String::new(),
        icd_secondary3: String::new(),
        length_of_stay: "4".to_string(),
        patient_type: "IN".to_string(),
    }
}

fn classification_request() -> ClassificationRequest {
    ClassificationRequest {
        icd_primary: "A41.9".to_string(),
        icd_secondary1: "J96.0".to_string(),
        icd_secondary2: String::new(),
        icd_secondary3: String::new(),
        length_of_stay: 4.0,
        patient_type: "IN".to_string(),
        referral_code: None,
    }
}

#[test]
fn stub_boot_serves_both_paths() {
    let engine = boot(&Config::default()).unwrap();

    assert_eq!(engine.mode, ArtifactMode::Stub);

    let cost = engine.cost.predict(&cost_request());
    assert!(cost.failed_buckets().is_empty());

    let classification = engine.classification.predict(&classification_request());
    assert!(classification.drug.is_ok());
    assert!(classification.radiology.is_ok());
    assert!(classification.laboratory.is_ok());
}

#[test]
fn stub_boot_is_deterministic() {
    let engine = boot(&Config::default()).unwrap();

    let a = engine.cost.predict(&cost_request());
    let b = engine.cost.predict(&cost_request());

    for (bucket, outcome) in a.iter() {
        assert_eq!(
            outcome.as_ref().ok(),
            b.get(bucket).and_then(|o| o.as_ref().ok())
        );
    }
}

#[test]
fn missing_assets_fail_boot() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        assets_dir: Some(dir.path().to_path_buf()),
        ..Config::default()
    };

    let err = boot(&config).unwrap_err();
    assert!(matches!(
        err,
        BootError::Table(TableError::FileNotFound { .. })
    ));
}

#[test]
fn artifact_mode_labels() {
    assert_eq!(ArtifactMode::Real.as_str(), "real");
    assert_eq!(ArtifactMode::Stub.as_str(), "stub");
}

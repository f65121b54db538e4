//! End-to-end engine tests against a synthesized assets directory.
//!
//! Builds every table file and all 19 model directories on disk with
//! hand-crafted weights (zero weight matrices, known biases), boots the
//! engine in real mode, and checks the predictions against hand-computed
//! expectations.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{Device, Tensor};
use tempfile::TempDir;

use clinicast::boot::{self, ArtifactMode};
use clinicast::config::Config;
use clinicast::cost::CostBucket;
use clinicast::encoder::{ClassificationRequest, CostRequest};
use clinicast::response::{DomainSection, shape_classification, shape_cost};

const DOMAINS: [&str; 3] = ["drug", "radiology", "laboratory"];

/// Writes a single-layer model whose output is exactly `biases` for any
/// input (weights are all zero).
fn write_model(dir: &Path, input_dim: usize, output: &str, biases: &[f32]) {
    fs::create_dir_all(dir).unwrap();

    let config = serde_json::json!({
        "input_dim": input_dim,
        "hidden_dims": [],
        "output_dim": biases.len(),
        "output": output,
    });
    fs::write(dir.join("config.json"), config.to_string()).unwrap();

    let device = Device::Cpu;
    let weight = Tensor::zeros((biases.len(), input_dim), candle_core::DType::F32, &device).unwrap();
    let bias = Tensor::from_vec(biases.to_vec(), (biases.len(),), &device).unwrap();

    let mut tensors = HashMap::new();
    tensors.insert("head.weight".to_string(), weight);
    tensors.insert("head.bias".to_string(), bias);
    candle_core::safetensors::save(&tensors, dir.join("model.safetensors")).unwrap();
}

fn write_icd_file(path: &Path) {
    let content = serde_json::json!({
        "icd_primary": {"after_encoding": {"A41.9": 1.25}},
        "icd_secondary1": {"after_encoding": {"J96.0": -0.5}},
        "icd_secondary2": {"after_encoding": {}},
        "icd_secondary3": {"after_encoding": {}},
    });
    fs::write(path, content.to_string()).unwrap();
}

/// Full assets tree: tables plus 13 cost and 6 classification models.
fn build_assets() -> TempDir {
    let root = TempDir::new().unwrap();
    let tables = root.path().join("tables");
    let models = root.path().join("models");
    fs::create_dir_all(tables.join("labels")).unwrap();
    fs::create_dir_all(tables.join("membership")).unwrap();

    write_icd_file(&tables.join("cost_icd_encodings.json"));
    write_icd_file(&tables.join("classification_icd_encodings.json"));

    fs::write(
        tables.join("patient_type_vocab.json"),
        serde_json::json!({
            "patient_type": {"original": ["IN", "EMG"], "encoded": [1.0, 0.0]}
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        tables.join("referral_code_vocab.json"),
        serde_json::json!({
            "referral_code": {"original": ["A", "B"], "encoded": [1.0, 2.0]}
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        tables.join("length_of_stay_scaler.json"),
        serde_json::json!({"mean": [2.0], "scale": [2.0]}).to_string(),
    )
    .unwrap();

    for domain in DOMAINS {
        fs::write(
            tables.join("labels").join(format!("{domain}_category.json")),
            serde_json::json!({
                "category": {"after_encoding": {"CatA": 0, "CatB": 1, "CatC": 2}}
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            tables.join("labels").join(format!("{domain}_procedure.json")),
            serde_json::json!({
                "procedure": {"after_encoding": {"SENT": 0, "P1": 1, "P2": 2}}
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            tables.join("membership").join(format!("{domain}.json")),
            serde_json::json!({
                "CatB": ["P1", "P2", "SENT"],
                "CatC": [],
            })
            .to_string(),
        )
        .unwrap();
    }

    // Cost regressors: bucket i predicts exactly 100 * (i + 1).
    for (i, bucket) in CostBucket::ALL.into_iter().enumerate() {
        write_model(
            &models.join("cost").join(bucket.as_str()),
            6,
            "regression",
            &[100.0 * (i + 1) as f32],
        );
    }

    // Category logits rank CatB > CatC > CatA; procedure logits rank
    // P2 > P1 > SENT.
    for domain in DOMAINS {
        write_model(
            &models.join("classification").join(format!("{domain}_category")),
            7,
            "distribution",
            &[0.0, 2.0, 1.0],
        );
        write_model(
            &models
                .join("classification")
                .join(format!("{domain}_procedure")),
            7,
            "distribution",
            &[0.0, 1.0, 2.0],
        );
    }

    root
}

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
fn real_boot_predicts_known_costs() {
    let assets = build_assets();
    let config = Config {
        assets_dir: Some(assets.path().to_path_buf()),
        ..Config::default()
    };

    let engine = boot::boot(&config).unwrap();
    assert_eq!(engine.mode, ArtifactMode::Real);

    let response = shape_cost(&engine.cost.predict(&cost_request()));

    assert_eq!(response.non_surgical, 100);
    assert_eq!(response.surgical, 200);
    assert_eq!(response.medicine, 1100);
    assert_eq!(response.total_cost, 1300);
    assert!(response.bucket_errors.is_empty());

    // Placeholder fields stay zero even in real mode.
    assert_eq!(response.specialist_consult, 0);
    assert_eq!(response.chemo_medicine, 0);
}

#[test]
fn real_boot_ranks_categories_and_procedures() {
    let assets = build_assets();
    let config = Config {
        assets_dir: Some(assets.path().to_path_buf()),
        ..Config::default()
    };

    let engine = boot::boot(&config).unwrap();
    let response = shape_classification(engine.classification.predict(&classification_request()));

    for section in [&response.drug, &response.radiology, &response.laboratory] {
        let DomainSection::Ok { top_categories } = section else {
            panic!("expected ok section, got {section:?}");
        };

        let names: Vec<&str> = top_categories
            .iter()
            .map(|c| c.category_name.as_str())
            .collect();
        assert_eq!(names, ["CatB", "CatC", "CatA"]);

        // CatB has real candidates; the sentinel is excluded and the rest
        // are ranked by the procedure distribution.
        let cat_b = &top_categories[0];
        let procedures: Vec<&str> = cat_b.procedures.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(procedures, ["P2", "P1"]);

        // No candidates (empty list and no entry) collapses to the
        // placeholder.
        assert_eq!(top_categories[1].procedures[0].name, "None");
        assert_eq!(top_categories[1].procedures[0].probability, 0.0);
        assert_eq!(top_categories[2].procedures[0].name, "None");
    }
}

#[test]
fn boot_fails_when_one_model_directory_is_missing() {
    let assets = build_assets();
    fs::remove_dir_all(
        assets
            .path()
            .join("models")
            .join("cost")
            .join(CostBucket::Medicine.as_str()),
    )
    .unwrap();

    let config = Config {
        assets_dir: Some(assets.path().to_path_buf()),
        ..Config::default()
    };

    assert!(boot::boot(&config).is_err());
}

#[test]
fn boot_rejects_artifact_with_wrong_input_width() {
    let assets = build_assets();
    // Re-export the drug category artifact with a 6-wide input; the
    // classification encoder produces 7 slots.
    write_model(
        &assets
            .path()
            .join("models")
            .join("classification")
            .join("drug_category"),
        6,
        "distribution",
        &[0.0, 2.0, 1.0],
    );

    let config = Config {
        assets_dir: Some(assets.path().to_path_buf()),
        ..Config::default()
    };

    let err = boot::boot(&config).unwrap_err();
    assert!(matches!(
        err,
        clinicast::BootError::InputWidthMismatch {
            expected: 7,
            actual: 6,
            ..
        }
    ));
}

#[test]
fn unknown_codes_still_predict() {
    let assets = build_assets();
    let config = Config {
        assets_dir: Some(assets.path().to_path_buf()),
        ..Config::default()
    };
    let engine = boot::boot(&config).unwrap();

    let request = CostRequest {
        icd_primary: "UNSEEN".to_string(),
        icd_secondary1: "ALSO-UNSEEN".to_string(),
        ..cost_request()
    };

    // Unknown codes encode to 0.0 and never abort a prediction.
    let response = shape_cost(&engine.cost.predict(&request));
    assert!(response.bucket_errors.is_empty());
    assert_eq!(response.non_surgical, 100);
}

//! Response shaping: truncation, rounding, stamping. No inference, no
//! lookups.
//!
//! The cost schema is wider than what the orchestrator predicts; the extra
//! fields are explicit zero-filled placeholders kept for compatibility with
//! the downstream dashboard. Failed buckets are zero-filled too, but are
//! listed in `bucket_errors` so callers can tell them from a genuine zero.


use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::constants::{MAX_TOP_CATEGORIES, MAX_TOP_PROCEDURES};
use crate::cost::{CostBucket, CostScores};
use crate::ranking::{ClassificationScores, DomainPrediction};

/// Outbound cost schema: 13 predicted buckets, 6 placeholder fields, and
/// per-bucket failure reasons.
#[derive(Debug, Clone, Serialize)]
pub struct CostResponse {
    pub non_surgical: u64,
    pub surgical: u64,
    pub doctor_consult: u64,
    pub specialist_consult: u64,
    pub nursing_action: u64,
    pub supportive_care: u64,
    pub radiology: u64,
    pub laboratory: u64,
    pub blood_service: u64,
    pub rehabilitation: u64,
    pub accommodation: u64,
    pub intensive_accommodation: u64,
    pub consumables: u64,
    pub medical_devices: u64,
    pub medicine: u64,
    pub chronic_medicine: u64,
    pub chemo_medicine: u64,
    pub medical_equipment: u64,
    pub total_cost: u64,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bucket_errors: BTreeMap<String, String>,
}

/// Outbound classification schema: one section per domain plus a single
/// UTC timestamp for the whole response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResponse {
    pub drug: DomainSection,
    pub radiology: DomainSection,
    pub laboratory: DomainSection,
    pub timestamp: String,
}

/// One domain's section: ranked categories, or a failure scoped to this
/// domain only.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DomainSection {
    #[serde(rename_all = "camelCase")]
    Ok {
        top_categories: Vec<crate::ranking::CategoryPrediction>,
    },
    Failed {
        error: String,
    },
}

/// `max(0, round(raw))` applied at the presentation boundary.
fn clamp_round(raw: f32) -> u64 {
    raw.round().max(0.0) as u64
}

/// Shapes raw per-bucket scores into the wide outbound cost schema.
pub fn shape_cost(scores: &CostScores) -> CostResponse {
    let mut bucket_errors = BTreeMap::new();
    let mut value = |bucket: CostBucket| match scores.get(bucket) {
        Some(Ok(raw)) => clamp_round(*raw),
        Some(Err(e)) => {
            bucket_errors.insert(bucket.as_str().to_string(), e.to_string());
            0
        }
        None => 0,
    };

    CostResponse {
        non_surgical: value(CostBucket::NonSurgical),
        surgical: value(CostBucket::Surgical),
        doctor_consult: value(CostBucket::DoctorConsult),
        specialist_consult: 0,
        nursing_action: value(CostBucket::NursingAction),
        supportive_care: 0,
        radiology: value(CostBucket::Radiology),
        laboratory: value(CostBucket::Laboratory),
        blood_service: value(CostBucket::BloodService),
        rehabilitation: value(CostBucket::Rehabilitation),
        accommodation: value(CostBucket::Accommodation),
        intensive_accommodation: value(CostBucket::IntensiveAccommodation),
        consumables: 0,
        medical_devices: 0,
        medicine: value(CostBucket::Medicine),
        chronic_medicine: 0,
        chemo_medicine: 0,
        medical_equipment: value(CostBucket::MedicalEquipment),
        total_cost: value(CostBucket::TotalCost),
        bucket_errors,
    }
}

/// Shapes per-domain ranking outcomes, re-enforcing the ≤4/≤2 bounds even
/// if an upstream stage misbehaved, and stamps the response.
pub fn shape_classification(scores: ClassificationScores) -> ClassificationResponse {
    ClassificationResponse {
        drug: shape_domain(scores.drug),
        radiology: shape_domain(scores.radiology),
        laboratory: shape_domain(scores.laboratory),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn shape_domain(
    outcome: Result<DomainPrediction, crate::ranking::RankingError>,
) -> DomainSection {
    match outcome {
        Ok(mut prediction) => {
            prediction.top_categories.truncate(MAX_TOP_CATEGORIES);
            for category in &mut prediction.top_categories {
                category.procedures.truncate(MAX_TOP_PROCEDURES);
            }
            DomainSection::Ok {
                top_categories: prediction.top_categories,
            }
        }
        Err(e) => DomainSection::Failed {
            error: e.to_string(),
        },
    }
}

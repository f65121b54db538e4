//! Feature encoders: structured requests in, fixed-length feature vectors
//! out.
//!
//! The cost path and the classification path are trained on different
//! frames and use deliberately distinct schemas — 6 slots with a raw
//! length-of-stay and a fixed patient-type vocabulary versus 7 slots with a
//! scaler-normalized length-of-stay and learned patient-type/referral
//! tables. Slot order is fixed by the artifacts' training layout; do not
//! reorder.

#[cfg(test)]
mod tests;

use serde::Deserialize;
use tracing::debug;

use crate::constants::{
    CLASSIFICATION_FEATURE_LEN, COST_FEATURE_LEN, DEFAULT_REFERRAL_CODE, PATIENT_TYPE_INPATIENT,
};
use crate::tables::{EncodingTable, Scaler};

/// Inbound cost-prediction request. Length-of-stay arrives as a string on
/// this path and parses leniently.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRequest {
    pub icd_primary: String,
    pub icd_secondary1: String,
    pub icd_secondary2: String,
    pub icd_secondary3: String,
    pub length_of_stay: String,
    pub patient_type: String,
}

/// Inbound classification request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    pub icd_primary: String,
    pub icd_secondary1: String,
    pub icd_secondary2: String,
    pub icd_secondary3: String,
    pub length_of_stay: f32,
    pub patient_type: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

/// The learned tables behind one ICD code column set.
#[derive(Debug, Clone, Default)]
pub struct IcdTables {
    pub primary: EncodingTable,
    pub secondary1: EncodingTable,
    pub secondary2: EncodingTable,
    pub secondary3: EncodingTable,
}

/// Encoder for the 6-slot cost schema:
/// `[icd_primary, icd_secondary1, icd_secondary2, icd_secondary3,
/// length_of_stay_raw, patient_type]`.
#[derive(Debug, Clone)]
pub struct CostFeatureEncoder {
    icd: IcdTables,
}

impl CostFeatureEncoder {
    pub fn new(icd: IcdTables) -> Self {
        Self { icd }
    }

    /// An encoder over empty tables: every categorical slot encodes to 0.0.
    pub fn stub() -> Self {
        Self::new(IcdTables::default())
    }

    pub fn encode(&self, request: &CostRequest) -> Vec<f32> {
        let length_of_stay = parse_length_of_stay(&request.length_of_stay);
        let patient_type = encode_fixed_patient_type(&request.patient_type);

        let features = vec![
            self.icd.primary.encode(&request.icd_primary),
            self.icd.secondary1.encode(&request.icd_secondary1),
            self.icd.secondary2.encode(&request.icd_secondary2),
            self.icd.secondary3.encode(&request.icd_secondary3),
            length_of_stay,
            patient_type,
        ];

        debug_assert_eq!(features.len(), COST_FEATURE_LEN);
        features
    }
}

/// Encoder for the 7-slot classification schema:
/// `[icd_primary, icd_secondary1, icd_secondary2, icd_secondary3,
/// length_of_stay_normalized, patient_type, referral_code]`.
#[derive(Debug, Clone)]
pub struct ClassificationFeatureEncoder {
    icd: IcdTables,
    patient_type: EncodingTable,
    referral_code: EncodingTable,
    length_of_stay: Scaler,
}

impl ClassificationFeatureEncoder {
    pub fn new(
        icd: IcdTables,
        patient_type: EncodingTable,
        referral_code: EncodingTable,
        length_of_stay: Scaler,
    ) -> Self {
        Self {
            icd,
            patient_type,
            referral_code,
            length_of_stay,
        }
    }

    /// An encoder over empty tables and an identity scaler.
    pub fn stub() -> Self {
        Self::new(
            IcdTables::default(),
            EncodingTable::empty(),
            EncodingTable::empty(),
            Scaler::identity(),
        )
    }

    pub fn encode(&self, request: &ClassificationRequest) -> Vec<f32> {
        let referral = request
            .referral_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(DEFAULT_REFERRAL_CODE);

        let features = vec![
            self.icd.primary.encode(&request.icd_primary),
            self.icd.secondary1.encode(&request.icd_secondary1),
            self.icd.secondary2.encode(&request.icd_secondary2),
            self.icd.secondary3.encode(&request.icd_secondary3),
            self.length_of_stay.normalize(request.length_of_stay),
            self.patient_type.encode(&request.patient_type),
            self.referral_code.encode(referral),
        ];

        debug_assert_eq!(features.len(), CLASSIFICATION_FEATURE_LEN);
        features
    }
}

fn parse_length_of_stay(raw: &str) -> f32 {
    let trimmed = raw.trim();
    match trimmed.parse::<f32>() {
        Ok(value) => value,
        Err(_) => {
            if !trimmed.is_empty() {
                debug!(value = %trimmed, "unparsable length-of-stay, defaulting to 0.0");
            }
            0.0
        }
    }
}

/// Cost-path patient type uses a fixed two-value vocabulary, not a learned
/// table: inpatient is 1.0, emergency (and anything else) is 0.0.
fn encode_fixed_patient_type(patient_type: &str) -> f32 {
    if patient_type.trim() == PATIENT_TYPE_INPATIENT {
        1.0
    } else {
        0.0
    }
}

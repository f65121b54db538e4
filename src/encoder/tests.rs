use super::*;
use crate::constants::PATIENT_TYPE_EMERGENCY;
use crate::tables::{EncodingTable, Scaler};

fn cost_request() -> CostRequest {
    CostRequest {
        icd_primary: "A00".to_string(),
        icd_secondary1: "B17".to_string(),
        icd_secondary2: "".to_string(),
        icd_secondary3: "".to_string(),
        length_of_stay: "7".to_string(),
        patient_type: "IN".to_string(),
    }
}

fn classification_request() -> ClassificationRequest {
    ClassificationRequest {
        icd_primary: "A00".to_string(),
        icd_secondary1: "B17".to_string(),
        icd_secondary2: "".to_string(),
        icd_secondary3: "".to_string(),
        length_of_stay: 7.0,
        patient_type: "IN".to_string(),
        referral_code: Some("B".to_string()),
    }
}

fn icd_tables() -> IcdTables {
    IcdTables {
        primary: EncodingTable::from_pairs([("A00", 1.25)]),
        secondary1: EncodingTable::from_pairs([("B17", -0.5)]),
        secondary2: EncodingTable::empty(),
        secondary3: EncodingTable::empty(),
    }
}

#[test]
fn cost_vector_has_six_slots_in_schema_order() {
    let encoder = CostFeatureEncoder::new(icd_tables());
    let features = encoder.encode(&cost_request());

    assert_eq!(features, vec![1.25, -0.5, 0.0, 0.0, 7.0, 1.0]);
}

#[test]
fn cost_unknown_icd_encodes_to_zero() {
    let encoder = CostFeatureEncoder::stub();
    let features = encoder.encode(&cost_request());

    assert_eq!(features[0], 0.0);
    assert_eq!(features[1], 0.0);
}

#[test]
fn cost_length_of_stay_is_parsed_raw() {
    let encoder = CostFeatureEncoder::stub();
    let mut request = cost_request();
    request.length_of_stay = " 12.5 ".to_string();

    assert_eq!(encoder.encode(&request)[4], 12.5);
}

#[test]
fn cost_unparsable_length_of_stay_defaults_to_zero() {
    let encoder = CostFeatureEncoder::stub();
    let mut request = cost_request();
    request.length_of_stay = "about a week".to_string();

    assert_eq!(encoder.encode(&request)[4], 0.0);
}

#[test]
fn cost_patient_type_uses_fixed_vocabulary() {
    let encoder = CostFeatureEncoder::stub();

    let mut request = cost_request();
    assert_eq!(encoder.encode(&request)[5], 1.0);

    request.patient_type = PATIENT_TYPE_EMERGENCY.to_string();
    assert_eq!(encoder.encode(&request)[5], 0.0);

    request.patient_type = "OUTPATIENT".to_string();
    assert_eq!(encoder.encode(&request)[5], 0.0);
}

#[test]
fn classification_vector_has_seven_slots_in_schema_order() {
    // Worked example: table {"A00": 1.25}, scaler {mean: 3.0, scale: 2.0},
    // length-of-stay 7 -> normalized 2.0, ICD-primary slot 1.25.
    let encoder = ClassificationFeatureEncoder::new(
        icd_tables(),
        EncodingTable::from_pairs([("IN", 1.0)]),
        EncodingTable::from_pairs([("A", 0.5), ("B", 2.0)]),
        Scaler::new(3.0, 2.0),
    );

    let features = encoder.encode(&classification_request());

    assert_eq!(features, vec![1.25, -0.5, 0.0, 0.0, 2.0, 1.0, 2.0]);
}

#[test]
fn classification_missing_referral_defaults_to_a() {
    let encoder = ClassificationFeatureEncoder::new(
        IcdTables::default(),
        EncodingTable::empty(),
        EncodingTable::from_pairs([("A", 0.5), ("B", 2.0)]),
        Scaler::identity(),
    );

    let mut request = classification_request();
    request.referral_code = None;
    assert_eq!(encoder.encode(&request)[6], 0.5);

    request.referral_code = Some("   ".to_string());
    assert_eq!(encoder.encode(&request)[6], 0.5);
}

#[test]
fn classification_referral_is_trimmed_before_lookup() {
    let encoder = ClassificationFeatureEncoder::new(
        IcdTables::default(),
        EncodingTable::empty(),
        EncodingTable::from_pairs([("B", 2.0)]),
        Scaler::identity(),
    );

    let mut request = classification_request();
    request.referral_code = Some(" B ".to_string());

    assert_eq!(encoder.encode(&request)[6], 2.0);
}

#[test]
fn classification_patient_type_uses_learned_table() {
    let encoder = ClassificationFeatureEncoder::new(
        IcdTables::default(),
        EncodingTable::from_pairs([("IN", 3.5)]),
        EncodingTable::empty(),
        Scaler::identity(),
    );

    let features = encoder.encode(&classification_request());

    // Learned value, not the cost path's fixed 1.0.
    assert_eq!(features[5], 3.5);
}

#[test]
fn encoding_is_deterministic() {
    let encoder = ClassificationFeatureEncoder::new(
        icd_tables(),
        EncodingTable::from_pairs([("IN", 1.0)]),
        EncodingTable::from_pairs([("B", 2.0)]),
        Scaler::new(3.0, 2.0),
    );
    let request = classification_request();

    assert_eq!(encoder.encode(&request), encoder.encode(&request));
}

#[test]
fn request_json_uses_wire_field_names() {
    let request: ClassificationRequest = serde_json::from_str(
        r#"{
            "icdPrimary": "A00",
            "icdSecondary1": "B17",
            "icdSecondary2": "",
            "icdSecondary3": "",
            "lengthOfStay": 3.0,
            "patientType": "IN",
            "referralCode": "A"
        }"#,
    )
    .unwrap();

    assert_eq!(request.icd_primary, "A00");
    assert_eq!(request.length_of_stay, 3.0);
    assert_eq!(request.referral_code.as_deref(), Some("A"));
}

#[test]
fn cost_request_json_length_of_stay_is_a_string() {
    let request: CostRequest = serde_json::from_str(
        r#"{
            "icdPrimary": "A00",
            "icdSecondary1": "",
            "icdSecondary2": "",
            "icdSecondary3": "",
            "lengthOfStay": "7",
            "patientType": "EMG"
        }"#,
    )
    .unwrap();

    assert_eq!(request.length_of_stay, "7");
}

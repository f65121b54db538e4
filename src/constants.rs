//! Shared dimension and ranking constants.
//!
//! The feature widths are fixed by the trained artifacts: reordering or
//! resizing a schema changes predictions silently, so both widths live here
//! and are asserted at artifact load time.

/// Number of slots in the cost-path feature vector.
pub const COST_FEATURE_LEN: usize = 6;

/// Number of slots in the classification-path feature vector.
pub const CLASSIFICATION_FEATURE_LEN: usize = 7;

/// Number of independently scored cost buckets.
pub const COST_BUCKET_COUNT: usize = 13;

/// Maximum categories returned per clinical domain.
pub const MAX_TOP_CATEGORIES: usize = 4;

/// Maximum procedures returned per category.
pub const MAX_TOP_PROCEDURES: usize = 2;

/// Reserved procedure-mapping index meaning "unknown/none". A candidate
/// resolving to this index never appears in ranked output.
pub const SENTINEL_PROCEDURE_INDEX: u32 = 0;

/// Label substituted when an artifact emits an index the mapping lacks.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Placeholder procedure emitted when a category has no eligible candidates.
pub const NO_PROCEDURE_LABEL: &str = "None";

/// Referral code assumed when the request omits one.
pub const DEFAULT_REFERRAL_CODE: &str = "A";

/// Cost-path patient-type vocabulary: inpatient.
pub const PATIENT_TYPE_INPATIENT: &str = "IN";

/// Cost-path patient-type vocabulary: emergency.
pub const PATIENT_TYPE_EMERGENCY: &str = "EMG";

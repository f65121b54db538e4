use serde::Serialize;

/// One ranked procedure under a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedurePrediction {
    pub name: String,
    pub probability: f32,
}

impl ProcedurePrediction {
    pub fn new(name: impl Into<String>, probability: f32) -> Self {
        Self {
            name: name.into(),
            probability,
        }
    }

    /// The `("None", 0.0)` placeholder emitted when a category has no
    /// eligible candidates.
    pub fn placeholder() -> Self {
        Self::new(crate::constants::NO_PROCEDURE_LABEL, 0.0)
    }
}

/// One ranked category with its ranked procedures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPrediction {
    pub category_name: String,
    pub probability: f32,
    pub procedures: Vec<ProcedurePrediction>,
}

/// Ranked output of one clinical domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainPrediction {
    pub top_categories: Vec<CategoryPrediction>,
}

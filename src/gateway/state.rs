use std::sync::Arc;

use crate::boot::{ArtifactMode, Engine};
use crate::cost::CostPredictor;
use crate::ranking::ClassificationPredictor;

/// Shared handler state: the two warmed predictors and the mode they were
/// booted in. Cloned per request; the predictors themselves are immutable.
#[derive(Clone)]
pub struct HandlerState {
    pub cost: Arc<CostPredictor>,
    pub classification: Arc<ClassificationPredictor>,
    pub artifact_mode: ArtifactMode,
}

impl HandlerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            cost: engine.cost,
            classification: engine.classification,
            artifact_mode: engine.mode,
        }
    }
}

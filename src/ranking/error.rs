use thiserror::Error;

use crate::artifact::ArtifactError;

#[derive(Debug, Error)]
pub enum RankingError {
    #[error("category artifact failed: {0}")]
    CategoryArtifact(#[source] ArtifactError),

    #[error("procedure artifact failed: {0}")]
    ProcedureArtifact(#[source] ArtifactError),
}

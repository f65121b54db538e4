use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::ArtifactError;
use crate::tables::TableError;

/// Warm-up failures. Any of these is fatal: the service refuses to start
/// rather than serve predictions from missing tables or artifacts.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("table load failed: {0}")]
    Table(#[from] TableError),

    #[error("artifact load failed: {0}")]
    Artifact(#[from] ArtifactError),

    #[error(
        "artifact at {} expects a {actual}-wide input, engine encodes {expected} slots",
        .path.display()
    )]
    InputWidthMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

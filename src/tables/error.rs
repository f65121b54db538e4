use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("key '{key}' not found in {}", .path.display())]
    KeyNotFound { path: PathBuf, key: String },

    #[error("scaler in {} is invalid: {reason}", .path.display())]
    InvalidScaler { path: PathBuf, reason: String },

    #[error("label mapping collision: '{first}' and '{second}' both map to index {index}")]
    IndexCollision {
        first: String,
        second: String,
        index: u32,
    },

    #[error("paired vocabulary in {} is misaligned: {originals} originals vs {encoded} encoded", .path.display())]
    MisalignedVocabulary {
        path: PathBuf,
        originals: usize,
        encoded: usize,
    },
}

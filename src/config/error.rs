use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port '{value}': {source}")]
    PortParseError {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("port must be non-zero, got '{value}'")]
    InvalidPort { value: String },

    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("path does not exist: {}", .path.display())]
    PathNotFound { path: PathBuf },

    #[error("path is not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },
}

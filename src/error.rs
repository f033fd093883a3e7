use std::path::PathBuf;

/// Errors produced by the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// No value table has been persisted at the given path yet
    #[error("no trained q-table found at {}", .0.display())]
    MissingTable(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid decay parameters: {0}")]
    InvalidDecay(String),

    #[error("invalid state key: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, Error>;

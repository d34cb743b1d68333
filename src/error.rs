use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong outside of the numerical core.
///
/// `step` and `reset` never fail: the post-update clamp keeps the arithmetic
/// total for any finite input.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Unknown parameter names, bad grid shapes, unparsable settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("no saved state found at {}", .0.display())]
    PersistenceNotFound(PathBuf),

    #[error("malformed state record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn config(message: impl Into<String>) -> Self {
        EngineError::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

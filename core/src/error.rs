use thiserror::Error;

/// Errors surfaced while persisting or restoring an index.
///
/// Text analysis and querying never fail; only structural I/O and
/// serialization problems are reported here.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Metadata error: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("Corrupt index: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;

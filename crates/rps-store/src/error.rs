use thiserror::Error;

/// Failures of a [`KeyValueStore`](crate::KeyValueStore) or of (de)serializing what it holds.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading, writing or renaming a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A value could not be turned into JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Keys are limited to ASCII letters, digits, `_` and `-`
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

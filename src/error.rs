//! Error types

/// Failure reading or writing the key-value store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying file or device error.
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored value could not be encoded or decoded.
    #[error("JSON error on key '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key is not usable as a storage name.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, StorageError>;

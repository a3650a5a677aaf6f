use std::path::PathBuf;

/// Errors from world store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No world exists at the given location.
    #[error("world not found: {}", .0.display())]
    WorldNotFound(PathBuf),

    /// The location exists but cannot hold a world store.
    #[error("not a world directory: {}", .0.display())]
    NotAWorld(PathBuf),

    /// The requested key is absent.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The handle has already been released.
    #[error("store is closed")]
    Closed,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

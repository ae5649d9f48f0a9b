use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A version-checked write did not match any stored record, either
    /// because the record changed since it was read or because it vanished.
    /// Callers are expected to re-read to tell the two cases apart.
    #[error("write conflict on {entity} `{id}`")]
    Conflict { entity: &'static str, id: i32 },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a conflict error for a version-checked write that missed.
    pub fn conflict(entity: &'static str, id: i32) -> Self {
        StorageError::Conflict { entity, id }
    }
}

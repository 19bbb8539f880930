//! Errors produced by `SessionStore` implementations.

use std::fmt;

/// Failure modes of the session store contract.
///
/// Every variant carries enough context to log a useful diagnostic without
/// leaking backend-specific types (sqlite error codes, file paths, ...) into
/// the core crate.
#[derive(Debug, Clone)]
pub enum SessionStoreError {
    /// The backend rejected or failed to complete a read/write/delete.
    StoreFailure { operation: &'static str, details: String },

    /// A value existed but could not be deserialized into the requested type.
    SerializationFailure { field: String, details: String },
}

pub type SessionStoreResult<T> = Result<T, SessionStoreError>;

impl fmt::Display for SessionStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStoreError::StoreFailure { operation, details } => {
                write!(f, "session store {operation} failed: {details}")
            }
            SessionStoreError::SerializationFailure { field, details } => {
                write!(f, "failed to deserialize field '{field}': {details}")
            }
        }
    }
}

impl std::error::Error for SessionStoreError {}

//! The durable, two-level key-value contract agents use to persist state.
//!
//! `SessionStore` addresses values by `(SessionId, SessionField)`, not by a
//! single flat key, because a session typically holds more than one piece of
//! state (the conversation transcript, a scratch counter, the interrupted
//! marker, ...) and callers need to touch one field without reading or
//! overwriting the others.
//!
//! The trait itself is object-safe (raw `String` payloads) so it can be held
//! as `Arc<dyn SessionStore>` behind `RequestContext`; `SessionStoreExt`
//! layers typed `save`/`get` on top via JSON encoding, the way callers
//! actually want to use it.

use crate::error::{SessionStoreError, SessionStoreResult};
use crate::identifiers::SessionId;
use crate::validation::{IdentifierRules, ValidationError};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// A validated field name within a session's state.
///
/// Reuses the same character/length policy as memory keys elsewhere in the
/// framework (alphanumeric, `_`, `-`, `.`, `:`, max 128 chars) so namespaced
/// field names like `reasoning:transcript` are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionField(String);

impl SessionField {
    pub fn parse(field: impl AsRef<str>) -> Result<Self, ValidationError> {
        IdentifierRules::MEMORY_KEY
            .validate(field.as_ref())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The field the lifecycle controller reserves for the interrupted
    /// marker. Agents must not write to this field directly.
    pub fn interrupted_marker() -> Self {
        Self("interrupted_state".to_string())
    }
}

impl fmt::Display for SessionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SessionField {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<SessionField> for String {
    fn from(field: SessionField) -> Self {
        field.0
    }
}

/// Durable storage for per-session agent state.
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across concurrently executing requests behind an `Arc`. Values are
/// opaque JSON-encoded strings to the store: it never inspects their
/// contents, only moves bytes. Object-safe so it can be stored as
/// `Arc<dyn SessionStore>`; see `SessionStoreExt` for the typed API callers
/// actually use.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Write `raw` (already JSON-encoded) under `(key, field)`, replacing
    /// any prior value.
    async fn save_raw(&self, key: &SessionId, field: &SessionField, raw: String) -> SessionStoreResult<()>;

    /// Read the raw JSON-encoded value under `(key, field)`, if any.
    async fn get_raw(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<Option<String>>;

    /// Remove the value under `(key, field)`. A no-op if absent.
    async fn delete(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<()>;

    /// Whether any field exists under `key`.
    async fn exists(&self, key: &SessionId) -> SessionStoreResult<bool>;
}

/// Typed convenience methods layered over the object-safe `SessionStore`
/// core. Blanket-implemented for every store, including trait objects.
#[async_trait]
pub trait SessionStoreExt: SessionStore {
    async fn save<T>(&self, key: &SessionId, field: &SessionField, value: &T) -> SessionStoreResult<()>
    where
        T: Serialize + Sync,
    {
        let raw = encode(field, value)?;
        self.save_raw(key, field, raw).await
    }

    async fn get<T>(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.get_raw(key, field).await? {
            Some(raw) => Ok(Some(decode(field, &raw)?)),
            None => Ok(None),
        }
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

/// Serialize a value into JSON or report a `SerializationFailure`.
pub fn encode<T: Serialize>(field: &SessionField, value: &T) -> SessionStoreResult<String> {
    serde_json::to_string(value).map_err(|e| SessionStoreError::SerializationFailure {
        field: field.as_str().to_string(),
        details: e.to_string(),
    })
}

/// Deserialize a stored JSON blob, or report a `SerializationFailure`.
pub fn decode<T: DeserializeOwned>(field: &SessionField, raw: &str) -> SessionStoreResult<T> {
    serde_json::from_str(raw).map_err(|e| SessionStoreError::SerializationFailure {
        field: field.as_str().to_string(),
        details: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_rejects_invalid_characters() {
        assert!(SessionField::parse("field with spaces").is_err());
        assert!(SessionField::parse("../escape").is_err());
    }

    #[test]
    fn field_allows_namespacing() {
        assert!(SessionField::parse("reasoning:transcript").is_ok());
        assert!(SessionField::parse("cache.counter").is_ok());
    }

    #[test]
    fn encode_decode_roundtrip() {
        let field = SessionField::parse("counter").unwrap();
        let encoded = encode(&field, &42u32).unwrap();
        let decoded: u32 = decode(&field, &encoded).unwrap();
        assert_eq!(decoded, 42);
    }

    #[test]
    fn decode_reports_serialization_failure() {
        let field = SessionField::parse("counter").unwrap();
        let err = decode::<u32>(&field, "not json").unwrap_err();
        assert!(matches!(err, SessionStoreError::SerializationFailure { .. }));
    }
}

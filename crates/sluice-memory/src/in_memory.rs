//! Fast, transient `SessionStore` backend backed by a lock-free `DashMap`.
//!
//! Suitable for development, testing, and single-replica deployments where
//! persistence across process restarts is not required. All data is lost
//! when the process terminates.

use async_trait::async_trait;
use dashmap::DashMap;
use sluice_core::error::SessionStoreResult;
use sluice_core::identifiers::SessionId;
use sluice_core::session_store::{SessionField, SessionStore};

/// In-memory `SessionStore`, keyed by `(SessionId, SessionField)`.
///
/// ```rust
/// # use sluice_memory::InMemorySessionStore;
/// # use sluice_core::{SessionField, SessionId, SessionStoreExt};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = InMemorySessionStore::new();
/// let key = SessionId::generate();
/// let field = SessionField::parse("counter").unwrap();
///
/// store.save(&key, &field, &42u32).await.unwrap();
/// let value: Option<u32> = store.get(&key, &field).await.unwrap();
/// assert_eq!(value, Some(42));
/// # }
/// ```
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    fields: DashMap<(SessionId, SessionField), String>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save_raw(&self, key: &SessionId, field: &SessionField, raw: String) -> SessionStoreResult<()> {
        self.fields.insert((key.clone(), field.clone()), raw);
        Ok(())
    }

    async fn get_raw(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<Option<String>> {
        Ok(self
            .fields
            .get(&(key.clone(), field.clone()))
            .map(|entry| entry.value().clone()))
    }

    async fn delete(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<()> {
        self.fields.remove(&(key.clone(), field.clone()));
        Ok(())
    }

    async fn exists(&self, key: &SessionId) -> SessionStoreResult<bool> {
        Ok(self.fields.iter().any(|entry| &entry.key().0 == key))
    }
}

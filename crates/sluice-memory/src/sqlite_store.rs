//! Durable `SessionStore` backend on top of SQLite.
//!
//! A single `session_fields` table holds every session's fields, keyed by
//! `(session_key, field)` — the two-level addressing the `SessionStore`
//! contract requires, rather than the single flat `key` column a plain
//! memory backend would use.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use sluice_core::error::{SessionStoreError, SessionStoreResult};
use sluice_core::identifiers::SessionId;
use sluice_core::session_store::{SessionField, SessionStore};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed `SessionStore`.
///
/// Connections are not cheaply `Clone`-able across threads, so access is
/// serialized behind a `Mutex`; under the coordination core's workload
/// (registration/abort/resume, not bulk reasoning-loop traffic) this is not
/// a bottleneck.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    pub fn open(path: impl AsRef<Path>) -> SessionStoreResult<Self> {
        let conn = Connection::open(path).map_err(|e| SessionStoreError::StoreFailure {
            operation: "open",
            details: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> SessionStoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| SessionStoreError::StoreFailure {
            operation: "open",
            details: e.to_string(),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> SessionStoreResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session_fields (
                session_key TEXT NOT NULL,
                field TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (session_key, field)
            )",
            [],
        )
        .map_err(|e| SessionStoreError::StoreFailure {
            operation: "migrate",
            details: e.to_string(),
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn save_raw(&self, key: &SessionId, field: &SessionField, raw: String) -> SessionStoreResult<()> {
        self.lock()
            .execute(
                "INSERT INTO session_fields (session_key, field, value, updated_at)
                 VALUES (?1, ?2, ?3, strftime('%s', 'now'))
                 ON CONFLICT(session_key, field) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at",
                params![key.as_str(), field.as_str(), raw],
            )
            .map_err(|e| SessionStoreError::StoreFailure {
                operation: "save",
                details: e.to_string(),
            })?;
        Ok(())
    }

    async fn get_raw(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<Option<String>> {
        self.lock()
            .query_row(
                "SELECT value FROM session_fields WHERE session_key = ?1 AND field = ?2",
                params![key.as_str(), field.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| SessionStoreError::StoreFailure {
                operation: "get",
                details: e.to_string(),
            })
    }

    async fn delete(&self, key: &SessionId, field: &SessionField) -> SessionStoreResult<()> {
        self.lock()
            .execute(
                "DELETE FROM session_fields WHERE session_key = ?1 AND field = ?2",
                params![key.as_str(), field.as_str()],
            )
            .map_err(|e| SessionStoreError::StoreFailure {
                operation: "delete",
                details: e.to_string(),
            })?;
        Ok(())
    }

    async fn exists(&self, key: &SessionId) -> SessionStoreResult<bool> {
        let count: i64 = self
            .lock()
            .query_row(
                "SELECT COUNT(*) FROM session_fields WHERE session_key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| SessionStoreError::StoreFailure {
                operation: "exists",
                details: e.to_string(),
            })?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::SessionStoreExt;

    #[tokio::test]
    async fn save_then_get_roundtrips() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let key = SessionId::generate();
        let field = SessionField::parse("counter").unwrap();

        store.save(&key, &field, &42u32).await.unwrap();
        let value: Option<u32> = store.get(&key, &field).await.unwrap();
        assert_eq!(value, Some(42));
    }

    #[tokio::test]
    async fn save_overwrites_existing_value() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let key = SessionId::generate();
        let field = SessionField::parse("counter").unwrap();

        store.save(&key, &field, &1u32).await.unwrap();
        store.save(&key, &field, &2u32).await.unwrap();
        let value: Option<u32> = store.get(&key, &field).await.unwrap();
        assert_eq!(value, Some(2));
    }

    #[tokio::test]
    async fn exists_false_for_unknown_session() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let key = SessionId::generate();
        assert!(!store.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn delete_then_exists_false() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let key = SessionId::generate();
        let field = SessionField::parse("counter").unwrap();

        store.save(&key, &field, &1u32).await.unwrap();
        store.delete(&key, &field).await.unwrap();
        assert!(!store.exists(&key).await.unwrap());
    }
}

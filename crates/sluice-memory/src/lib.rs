//! # sluice-memory
//!
//! `SessionStore` backend implementations.
//!
//! - [`InMemorySessionStore`]: transient, `DashMap`-backed, always available
//! - [`SqliteSessionStore`]: durable, file- or in-memory-backed SQLite store,
//!   behind the `sqlite` feature
//!
//! ```rust
//! use sluice_memory::InMemorySessionStore;
//! use sluice_core::{SessionField, SessionId, SessionStoreExt};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemorySessionStore::new();
//! let key = SessionId::generate();
//! let field = SessionField::parse("transcript").unwrap();
//! store.save(&key, &field, &"hello").await.unwrap();
//! # }
//! ```

mod in_memory;
pub use in_memory::InMemorySessionStore;

#[cfg(feature = "sqlite")]
mod sqlite_store;
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteSessionStore;

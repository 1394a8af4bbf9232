//! Store backends implementing [`crate::runtime::KeyValueStore`].
//!
//! [`memory::MemoryStore`] backs the session namespace and tests; the
//! durable namespace gets [`sqlite::SqliteStore`] on native targets.

pub mod memory;
#[cfg(not(target_arch = "wasm32"))]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::SqliteStore;

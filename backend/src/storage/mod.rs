//! Storage layer: the [`ZooStore`] boundary and its two implementations.

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryStore;
pub use sqlite::{DbConnection, SqliteStore};
pub use traits::{StoreError, StoreResult, ZooStore};

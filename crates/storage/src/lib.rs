pub mod db;
pub mod error;
pub mod kv;
pub mod repositories;

pub use db::SqliteStore;
pub use error::StorageError;
pub use kv::{KeyValueStore, MemoryStore};

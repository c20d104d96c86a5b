//! Key/value store implementations.
//!
//! - [`FileKeyValueStore`]: one JSON object file, rewritten atomically on every set
//! - [`InMemoryKeyValueStore`]: process-local map for tests and ephemeral runs

mod file_store;
mod memory_store;

pub use file_store::FileKeyValueStore;
pub use memory_store::InMemoryKeyValueStore;

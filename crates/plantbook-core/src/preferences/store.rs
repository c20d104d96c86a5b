//! Key/value store trait.

use async_trait::async_trait;

use crate::error::Result;

/// Fixed key under which the whole preference record is stored.
pub const PREFERENCES_KEY: &str = "preferences";

/// Generic string key/value persistence, the local preference store.
///
/// Writes are last-write-wins; there are no transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value stored under `key`, or `None` if the key is absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
}

//! Plant lookup trait.

use async_trait::async_trait;

use super::model::PlantRecord;
use crate::error::Result;

/// Remote plant database consumed by the listing flow.
///
/// Transport and wire format are the implementation's concern.
#[async_trait]
pub trait PlantLookup: Send + Sync {
    /// Searches plants by free-text term.
    async fn search_plants(&self, term: &str) -> Result<Vec<PlantRecord>>;

    /// Lists plants, optionally narrowed by a filter token.
    ///
    /// An empty `filter_token` means the unfiltered listing.
    async fn list_plants(&self, filter_token: &str) -> Result<Vec<PlantRecord>>;
}

//! Remote collection source abstraction.
//!
//! The engines never talk to the network directly. Anything that can fetch a
//! range of a collection, or the whole of it, can back a feed or a table.

pub mod mock;

use async_trait::async_trait;
use listsync_types::{Record, ResourceKind, TransportResult};

/// A remote source of records, addressed by resource kind.
#[async_trait]
pub trait RemoteCollectionSource: Send + Sync {
    /// Fetches at most `limit` records starting at offset `start`, in
    /// collection order.
    async fn fetch_range(
        &self,
        resource: ResourceKind,
        start: usize,
        limit: usize,
    ) -> TransportResult<Vec<Record>>;

    /// Fetches the entire collection.
    async fn fetch_all(&self, resource: ResourceKind) -> TransportResult<Vec<Record>>;
}

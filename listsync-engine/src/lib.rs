//! Incremental list synchronization engine for listsync.
//!
//! Two independent engines share one pattern: pull records from a
//! [`RemoteCollectionSource`] and expose a read model a view can render.
//!
//! ## Components
//!
//! - **Source**: the async seam to the network, plus an in-memory mock
//! - **Viewport**: injected viewport classification for the page size policy
//! - **Feed**: [`FeedLoader`] accumulates pages and guards against overlapping
//!   loads and stale responses
//! - **Table**: [`TableView`] keeps a filtered and sorted projection of a fully
//!   loaded collection
//!
//! # Example
//!
//! ```
//! use listsync_engine::source::mock::MockCollectionSource;
//! use listsync_engine::{FeedLoader, FixedViewport};
//! use listsync_types::{PageSizePolicy, Record, ResourceKind, ViewportClass};
//! use std::sync::Arc;
//!
//! # tokio_test_block_on(async {
//! let posts = (1..=12).map(|id| Record::new().with("id", id)).collect();
//! let source = Arc::new(MockCollectionSource::new().with_collection(ResourceKind::Posts, posts));
//! let loader = FeedLoader::new(
//!     source,
//!     ResourceKind::Posts,
//!     Arc::new(FixedViewport(ViewportClass::Normal)),
//!     PageSizePolicy::default(),
//! );
//!
//! loader.mount().await.unwrap();
//! loader.load_next().await;
//!
//! let snapshot = loader.snapshot();
//! assert_eq!(snapshot.items.len(), 12);
//! assert!(!snapshot.has_more);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod feed;
pub mod ordering;
pub mod source;
mod table;
mod viewport;

pub use feed::{FeedLoader, FeedSnapshot, LoadOutcome};
pub use source::RemoteCollectionSource;
pub use table::{
    derive_view, Column, SearchState, SortDirection, SortState, TableView, USER_COLUMNS,
};
pub use viewport::{FixedViewport, SharedViewport, ViewportClassifier};

//! Core type definitions for listsync.
//!
//! This crate defines the plain data shared by the engine, the HTTP source
//! and the proxy server:
//! - [`Record`]: an opaque JSON object identified by its `id` field
//! - [`Page`]: one range of records, tagged with the requested offset and limit
//! - [`ResourceKind`]: the named collections a source can serve
//! - [`ViewportClass`] and [`PageSizePolicy`]: how the feed picks its page size
//! - [`TransportError`] and [`UsageError`]: the two failure families of the core

mod error;
mod page;
mod record;
mod viewport;

pub use error::{TransportError, TransportResult, UsageError};
pub use page::{Page, ResourceKind};
pub use record::Record;
pub use viewport::{PageSizePolicy, ViewportClass, SMALL_VIEWPORT_BREAKPOINT};

//! Paged feed loader.
//!
//! Accumulates pages of a remote collection on demand. Two rules keep the
//! feed consistent:
//!
//! 1. **One load at a time.** `load_next` is dropped while another load is in
//!    flight, so pages are never appended out of order or fetched twice.
//! 2. **Epochs.** Every `initialize` starts a new epoch. A response is only
//!    applied if the epoch it was requested in is still current, so a reset
//!    (e.g. after a viewport change) cannot be overwritten by a late page.
//!
//! State lives behind a mutex that is never held across an `.await`; several
//! calls may be polled concurrently on one task.

use crate::source::RemoteCollectionSource;
use crate::viewport::ViewportClassifier;
use listsync_types::{Page, PageSizePolicy, Record, ResourceKind, TransportError, UsageError};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// What a load call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetch succeeded and its records were applied.
    Loaded { received: usize },
    /// No request was issued (busy, exhausted or not yet initialized).
    Skipped,
    /// The fetch failed; state was left at its last known good values.
    Failed,
    /// The fetch completed after a reset and its result was discarded.
    Stale,
}

/// Read model of a feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub items: Vec<Record>,
    pub is_loading: bool,
    pub has_more: bool,
    pub current_page: usize,
    pub page_size: usize,
    pub epoch: u64,
}

impl FeedSnapshot {
    /// Whether a "load more" control should be enabled.
    pub fn can_load_more(&self) -> bool {
        self.has_more && !self.is_loading
    }
}

#[derive(Debug)]
struct FeedState {
    items: Vec<Record>,
    current_page: usize,
    has_more: bool,
    is_loading: bool,
    /// Zero until the first `initialize`.
    page_size: usize,
    epoch: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_more: true,
            is_loading: false,
            page_size: 0,
            epoch: 0,
        }
    }
}

/// Loads a remote collection page by page.
pub struct FeedLoader {
    source: Arc<dyn RemoteCollectionSource>,
    resource: ResourceKind,
    viewport: Arc<dyn ViewportClassifier>,
    policy: PageSizePolicy,
    state: Mutex<FeedState>,
}

impl FeedLoader {
    pub fn new(
        source: Arc<dyn RemoteCollectionSource>,
        resource: ResourceKind,
        viewport: Arc<dyn ViewportClassifier>,
        policy: PageSizePolicy,
    ) -> Self {
        Self {
            source,
            resource,
            viewport,
            policy,
            state: Mutex::new(FeedState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page size the policy picks for the current viewport.
    pub fn policy_page_size(&self) -> usize {
        self.policy.page_size(self.viewport.classify())
    }

    /// Initial load using the page size of the current viewport.
    pub async fn mount(&self) -> Result<LoadOutcome, UsageError> {
        self.initialize(self.policy_page_size()).await
    }

    /// Re-reads the viewport and resets the feed if its page size changed.
    ///
    /// Returns `None` when the page size is unchanged and nothing was fetched.
    pub async fn sync_viewport(&self) -> Result<Option<LoadOutcome>, UsageError> {
        let page_size = self.policy_page_size();
        let current = self.state().page_size;
        if page_size == current {
            return Ok(None);
        }
        info!(
            resource = %self.resource,
            from = current,
            to = page_size,
            "page size changed, resetting feed"
        );
        self.initialize(page_size).await.map(Some)
    }

    /// Discards all items and loads the first page with `page_size`.
    ///
    /// `has_more` is left untouched until the first page arrives.
    pub async fn initialize(&self, page_size: usize) -> Result<LoadOutcome, UsageError> {
        if page_size == 0 {
            return Err(UsageError::ZeroPageSize);
        }

        let epoch = {
            let mut state = self.state();
            state.epoch += 1;
            state.items.clear();
            state.current_page = 0;
            state.page_size = page_size;
            state.is_loading = true;
            state.epoch
        };

        debug!(resource = %self.resource, epoch, page_size, "loading first page");
        let result = self.source.fetch_range(self.resource, 0, page_size).await;
        Ok(self.apply(epoch, 0, page_size, result, |state, page| {
            state.items = page.records;
        }))
    }

    /// Appends the next page.
    ///
    /// Skipped while a load is in flight, once a short page has been seen, or
    /// before the feed is initialized.
    pub async fn load_next(&self) -> LoadOutcome {
        let (epoch, start, page_size) = {
            let mut state = self.state();
            if state.is_loading {
                debug!(resource = %self.resource, "load already in flight, skipping");
                return LoadOutcome::Skipped;
            }
            if !state.has_more || state.page_size == 0 {
                return LoadOutcome::Skipped;
            }
            state.is_loading = true;
            (
                state.epoch,
                (state.current_page + 1) * state.page_size,
                state.page_size,
            )
        };

        debug!(resource = %self.resource, epoch, start, page_size, "loading next page");
        let result = self.source.fetch_range(self.resource, start, page_size).await;
        self.apply(epoch, start, page_size, result, |state, page| {
            state.items.extend(page.records);
            state.current_page += 1;
        })
    }

    fn apply(
        &self,
        epoch: u64,
        start: usize,
        page_size: usize,
        result: Result<Vec<Record>, TransportError>,
        merge: impl FnOnce(&mut FeedState, Page),
    ) -> LoadOutcome {
        let mut state = self.state();
        if state.epoch != epoch {
            debug!(
                resource = %self.resource,
                epoch,
                current = state.epoch,
                "discarding stale page"
            );
            return LoadOutcome::Stale;
        }
        state.is_loading = false;

        match result {
            Ok(records) => {
                let page = Page::new(start, page_size, records);
                let received = page.len();
                state.has_more = page.is_full();
                merge(&mut *state, page);
                LoadOutcome::Loaded { received }
            }
            Err(e) => {
                warn!(resource = %self.resource, start, error = %e, "failed to fetch page");
                LoadOutcome::Failed
            }
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.state();
        FeedSnapshot {
            items: state.items.clone(),
            is_loading: state.is_loading,
            has_more: state.has_more,
            current_page: state.current_page,
            page_size: state.page_size,
            epoch: state.epoch,
        }
    }

    pub fn items(&self) -> Vec<Record> {
        self.state().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn has_more(&self) -> bool {
        self.state().has_more
    }

    /// Whether a "load more" control should be enabled.
    pub fn can_load_more(&self) -> bool {
        let state = self.state();
        state.has_more && !state.is_loading
    }

    pub fn resource(&self) -> ResourceKind {
        self.resource
    }
}

//! An in-memory source for tests.
//!
//! Records every call it receives, can fail on demand, and can hold fetches
//! in flight until the test releases them.

use super::RemoteCollectionSource;
use async_trait::async_trait;
use listsync_types::{Record, ResourceKind, TransportError, TransportResult};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

/// One call observed by [`MockCollectionSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCall {
    Range {
        resource: ResourceKind,
        start: usize,
        limit: usize,
    },
    All {
        resource: ResourceKind,
    },
}

/// Releases fetches held by a gated [`MockCollectionSource`].
#[derive(Debug, Clone)]
pub struct FetchGate(Arc<Semaphore>);

impl FetchGate {
    /// Lets `n` pending (or future) fetches complete.
    pub fn release(&self, n: usize) {
        self.0.add_permits(n);
    }
}

/// In-memory collections with call recording and failure injection.
#[derive(Debug, Default)]
pub struct MockCollectionSource {
    collections: Mutex<HashMap<ResourceKind, Vec<Record>>>,
    calls: Mutex<Vec<FetchCall>>,
    failures: Mutex<VecDeque<TransportError>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockCollectionSource {
    /// Creates a source with no collections; every fetch returns nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MockCollectionSource::set_collection`].
    pub fn with_collection(self, resource: ResourceKind, records: Vec<Record>) -> Self {
        self.set_collection(resource, records);
        self
    }

    /// Holds every fetch until the returned gate releases it.
    pub fn gated(mut self) -> (Self, FetchGate) {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gate = Some(semaphore.clone());
        (self, FetchGate(semaphore))
    }

    /// Replaces the contents of a collection.
    pub fn set_collection(&self, resource: ResourceKind, records: Vec<Record>) {
        lock(&self.collections).insert(resource, records);
    }

    /// Makes the next fetch fail with `error`. Failures queue up in order.
    pub fn fail_next(&self, error: TransportError) {
        lock(&self.failures).push_back(error);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<FetchCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    async fn enter(&self, call: FetchCall) -> TransportResult<()> {
        lock(&self.calls).push(call);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| TransportError::Network("gate closed".into()))?
                .forget();
        }
        match lock(&self.failures).pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteCollectionSource for MockCollectionSource {
    async fn fetch_range(
        &self,
        resource: ResourceKind,
        start: usize,
        limit: usize,
    ) -> TransportResult<Vec<Record>> {
        self.enter(FetchCall::Range {
            resource,
            start,
            limit,
        })
        .await?;

        let collections = lock(&self.collections);
        Ok(collections
            .get(&resource)
            .map(|records| records.iter().skip(start).take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_all(&self, resource: ResourceKind) -> TransportResult<Vec<Record>> {
        self.enter(FetchCall::All { resource }).await?;
        Ok(lock(&self.collections)
            .get(&resource)
            .cloned()
            .unwrap_or_default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

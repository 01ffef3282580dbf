#![allow(dead_code)]

use listsync_engine::source::mock::MockCollectionSource;
use listsync_engine::{FeedLoader, FixedViewport, ViewportClassifier};
use listsync_types::{PageSizePolicy, Record, ResourceKind, ViewportClass};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn posts(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|id| {
            Record::new()
                .with("id", id as u64)
                .with("title", format!("post {id}"))
        })
        .collect()
}

pub fn ids(records: &[Record]) -> Vec<u64> {
    records
        .iter()
        .filter_map(|r| r.id().and_then(|v| v.as_u64()))
        .collect()
}

pub fn post_source(n: usize) -> Arc<MockCollectionSource> {
    Arc::new(MockCollectionSource::new().with_collection(ResourceKind::Posts, posts(n)))
}

pub fn loader_with(
    source: Arc<MockCollectionSource>,
    viewport: Arc<dyn ViewportClassifier>,
) -> FeedLoader {
    FeedLoader::new(
        source,
        ResourceKind::Posts,
        viewport,
        PageSizePolicy::default(),
    )
}

pub fn loader(source: Arc<MockCollectionSource>) -> FeedLoader {
    loader_with(source, Arc::new(FixedViewport(ViewportClass::Normal)))
}

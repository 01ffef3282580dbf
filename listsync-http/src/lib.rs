//! HTTP implementation of [`RemoteCollectionSource`].
//!
//! Talks to the listsync proxy API:
//! - `GET {base}/api/v1/{kind}?start={start}&limit={limit}` for a range
//! - `GET {base}/api/v1/{kind}` for a whole collection
//!
//! Every failure (connection, non-2xx status, undecodable body) becomes a
//! [`TransportError`].

use async_trait::async_trait;
use listsync_engine::RemoteCollectionSource;
use listsync_types::{Page, Record, ResourceKind, TransportError, TransportResult};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Configuration for [`HttpCollectionSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// Base URL of the proxy (e.g. `http://localhost:3000`).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Fetches collections over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCollectionSource {
    config: HttpSourceConfig,
    client: Client,
}

impl HttpCollectionSource {
    /// Creates a source with its own HTTP client.
    pub fn new(config: HttpSourceConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a source sharing an existing client.
    pub fn with_client(config: HttpSourceConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }

    fn collection_url(&self, resource: ResourceKind) -> String {
        format!(
            "{}/api/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            resource
        )
    }

    async fn get_records(&self, request: RequestBuilder, url: &str) -> TransportResult<Vec<Record>> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<Vec<Record>>()
            .await
            .map_err(|e| TransportError::Decode(format!("invalid records from {url}: {e}")))
    }
}

#[async_trait]
impl RemoteCollectionSource for HttpCollectionSource {
    async fn fetch_range(
        &self,
        resource: ResourceKind,
        start: usize,
        limit: usize,
    ) -> TransportResult<Vec<Record>> {
        let url = self.collection_url(resource);
        debug!(%url, start, limit, "fetching range");
        let request = self
            .client
            .get(&url)
            .query(&[("start", start), ("limit", limit)]);
        let records = self.get_records(request, &url).await?;
        Ok(Page::new(start, limit, records).records)
    }

    async fn fetch_all(&self, resource: ResourceKind) -> TransportResult<Vec<Record>> {
        let url = self.collection_url(resource);
        debug!(%url, "fetching collection");
        let request = self.client.get(&url);
        self.get_records(request, &url).await
    }
}

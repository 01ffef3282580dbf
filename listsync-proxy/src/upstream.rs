//! Client for the upstream mock REST API.

use crate::error::{ProxyError, ProxyResult};
use listsync_types::Record;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Thin typed wrapper over the upstream endpoints the proxy aggregates.
#[derive(Debug, Clone)]
pub struct Upstream {
    base_url: String,
    client: Client,
}

impl Upstream {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ProxyResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, usize)]) -> ProxyResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, ?query, "upstream request");
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }

    /// Posts `[start, start + limit)` in upstream order.
    pub async fn posts(&self, start: usize, limit: usize) -> ProxyResult<Vec<Record>> {
        self.get("posts", &[("_start", start), ("_limit", limit)]).await
    }

    /// Photos of one album.
    pub async fn album_photos(&self, album_id: u64) -> ProxyResult<Vec<Record>> {
        self.get(&format!("albums/{album_id}/photos"), &[]).await
    }

    pub async fn users(&self) -> ProxyResult<Vec<Record>> {
        self.get("users", &[]).await
    }

    pub async fn user(&self, user_id: &str) -> ProxyResult<Record> {
        self.get(&format!("users/{user_id}"), &[]).await
    }
}

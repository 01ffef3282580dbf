//! HTTP API of the listsync proxy.
//!
//! Serves the two collections the engines consume, built from an upstream
//! mock REST API:
//! - `GET /api/v1/posts?start=&limit=`: a range of posts, each enriched with
//!   its first photos and its author
//! - `GET /api/v1/users`: every user
//! - `GET /api/v1/users/{id}`: one user

mod error;
mod upstream;

pub use error::{ApiError, ErrorBody, ProxyError, ProxyResult};
pub use upstream::Upstream;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use futures::future::try_join_all;
use listsync_types::Record;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const POSTS_ERROR: &str = "An error occurred while fetching posts, images, or users";
const USERS_ERROR: &str = "An error occurred while fetching users";

/// Proxy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL of the upstream mock API.
    pub upstream_base_url: String,
    /// How many album photos are attached to each post.
    pub images_per_post: usize,
    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: "https://jsonplaceholder.typicode.com".to_string(),
            images_per_post: 3,
            timeout_secs: 30,
        }
    }
}

/// Shared state of the API handlers.
#[derive(Debug)]
pub struct ProxyState {
    upstream: Upstream,
    images_per_post: usize,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> ProxyResult<Self> {
        Ok(Self {
            upstream: Upstream::new(
                config.upstream_base_url.clone(),
                Duration::from_secs(config.timeout_secs),
            )?,
            images_per_post: config.images_per_post,
        })
    }

    /// Attaches `images` and `user` to a post.
    async fn enrich_post(&self, mut post: Record) -> ProxyResult<Record> {
        let post_id = post
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ProxyError::Malformed("post without numeric id".into()))?;
        let user_id = post
            .get("userId")
            .and_then(Value::as_u64)
            .ok_or_else(|| ProxyError::Malformed(format!("post {post_id} without userId")))?;

        let user_id = user_id.to_string();
        let (photos, user) = tokio::try_join!(
            self.upstream.album_photos(post_id),
            self.upstream.user(&user_id),
        )?;

        let images: Vec<Value> = photos
            .iter()
            .take(self.images_per_post)
            .map(|photo| json!({ "url": photo.get("url").cloned().unwrap_or(Value::Null) }))
            .collect();

        post.insert("images", Value::Array(images));
        post.insert("user", user.into());
        Ok(post)
    }
}

/// Range parameters of the posts endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub start: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

async fn posts_handler(
    State(state): State<Arc<ProxyState>>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let posts = state
        .upstream
        .posts(range.start, range.limit)
        .await
        .map_err(|e| ApiError::new(POSTS_ERROR, e))?;

    let enriched = try_join_all(posts.into_iter().map(|post| state.enrich_post(post)))
        .await
        .map_err(|e| ApiError::new(POSTS_ERROR, e))?;

    Ok(Json(enriched))
}

async fn users_handler(
    State(state): State<Arc<ProxyState>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    state
        .upstream
        .users()
        .await
        .map(Json)
        .map_err(|e| ApiError::new(USERS_ERROR, e))
}

async fn user_handler(
    State(state): State<Arc<ProxyState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    state
        .upstream
        .user(&user_id)
        .await
        .map(Json)
        .map_err(|e| ApiError::new(format!("Error fetching user with ID {user_id}"), e))
}

/// Build the HTTP API router over the given state.
pub fn build_router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/api/v1/posts", get(posts_handler))
        .route("/api/v1/users", get(users_handler))
        .route("/api/v1/users/{user_id}", get(user_handler))
        .with_state(state)
}

use listsync_engine::{FeedLoader, FixedViewport, LoadOutcome, TableView};
use listsync_http::{HttpCollectionSource, HttpSourceConfig};
use listsync_proxy::{build_router, ErrorBody, ProxyConfig, ProxyState};
use listsync_types::{PageSizePolicy, ResourceKind, ViewportClass};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Spin up the proxy on an OS-assigned port in front of `upstream`,
/// returning the base URL.
async fn spawn_proxy(upstream: &MockServer) -> String {
    let config = ProxyConfig {
        upstream_base_url: upstream.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    let app = build_router(Arc::new(ProxyState::new(&config).unwrap()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

fn upstream_posts(ids: std::ops::RangeInclusive<u64>) -> Value {
    Value::Array(
        ids.map(|id| json!({"userId": (id - 1) / 10 + 1, "id": id, "title": format!("post {id}"), "body": "..."}))
            .collect(),
    )
}

fn photos(album: u64, n: u64) -> Value {
    Value::Array(
        (1..=n)
            .map(|i| json!({"albumId": album, "id": i, "url": format!("https://via.placeholder.com/{album}/{i}")}))
            .collect(),
    )
}

fn upstream_user(id: u64) -> Value {
    json!({"id": id, "name": format!("User {id}"), "email": format!("user{id}@example.com")})
}

async fn mount_photos_and_users(upstream: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/albums/\d+/photos$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(photos(1, 5)))
        .mount(upstream)
        .await;
    for id in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/users/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream_user(id)))
            .mount(upstream)
            .await;
    }
}

// ── Config ───────────────────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = ProxyConfig::default();
    assert_eq!(config.upstream_base_url, "https://jsonplaceholder.typicode.com");
    assert_eq!(config.images_per_post, 3);
    assert_eq!(config.timeout_secs, 30);
}

// ── /api/v1/posts ────────────────────────────────────────────────

#[tokio::test]
async fn posts_are_enriched_with_images_and_user() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_start", "0"))
        .and(query_param("_limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_posts(1..=2)))
        .expect(1)
        .mount(&upstream)
        .await;
    mount_photos_and_users(&upstream).await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/posts?start=0&limit=2", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["id"], json!(1));
    assert_eq!(body[0]["title"], json!("post 1"));
    assert_eq!(body[0]["images"].as_array().unwrap().len(), 3);
    assert_eq!(
        body[0]["images"][0],
        json!({"url": "https://via.placeholder.com/1/1"})
    );
    assert_eq!(body[1]["user"], upstream_user(1));
}

#[tokio::test]
async fn posts_default_range() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_start", "0"))
        .and(query_param("_limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&upstream)
        .await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/posts", base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Vec<Value> = resp.json().await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn posts_upstream_failure_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/posts?start=10&limit=5", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(
        body.error,
        "An error occurred while fetching posts, images, or users"
    );
}

#[tokio::test]
async fn posts_missing_author_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_posts(31..=31)))
        .mount(&upstream)
        .await;
    mount_photos_and_users(&upstream).await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/posts?start=30&limit=1", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn posts_without_user_id_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "title": "orphan"}])))
        .mount(&upstream)
        .await;
    mount_photos_and_users(&upstream).await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/posts", base)).await.unwrap();

    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn posts_invalid_range_is_rejected() {
    let upstream = MockServer::start().await;
    let base = spawn_proxy(&upstream).await;

    let resp = reqwest::get(format!("{}/api/v1/posts?start=-1", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

// ── /api/v1/users ────────────────────────────────────────────────

#[tokio::test]
async fn users_are_passed_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([upstream_user(1), upstream_user(2)])),
        )
        .mount(&upstream)
        .await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/users", base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([upstream_user(1), upstream_user(2)]));
}

#[tokio::test]
async fn users_upstream_failure_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/users", base)).await.unwrap();

    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.error, "An error occurred while fetching users");
}

#[tokio::test]
async fn single_user() {
    let upstream = MockServer::start().await;
    mount_photos_and_users(&upstream).await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/users/2", base)).await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, upstream_user(2));
}

#[tokio::test]
async fn unknown_user_is_500_with_id_in_message() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&upstream)
        .await;

    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/users/42", base)).await.unwrap();

    assert_eq!(resp.status(), 500);
    let body: ErrorBody = resp.json().await.unwrap();
    assert_eq!(body.error, "Error fetching user with ID 42");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let upstream = MockServer::start().await;
    let base = spawn_proxy(&upstream).await;
    let resp = reqwest::get(format!("{}/api/v1/nonexistent", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
}

// ── Engines through the proxy ────────────────────────────────────

#[tokio::test]
async fn feed_and_table_through_proxy() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_posts(1..=5)))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_start", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_posts(6..=7)))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Bob", "email": "b@x.com"},
            {"id": 2, "name": "Alice", "email": "a@x.com"}
        ])))
        .mount(&upstream)
        .await;
    mount_photos_and_users(&upstream).await;

    let base = spawn_proxy(&upstream).await;
    let source = Arc::new(
        HttpCollectionSource::new(HttpSourceConfig {
            base_url: base,
            timeout_secs: 5,
        })
        .unwrap(),
    );

    let feed = FeedLoader::new(
        source.clone(),
        ResourceKind::Posts,
        Arc::new(FixedViewport(ViewportClass::Small)),
        PageSizePolicy::default(),
    );
    feed.mount().await.unwrap();
    assert_eq!(feed.load_next().await, LoadOutcome::Loaded { received: 2 });

    let snapshot = feed.snapshot();
    assert_eq!(snapshot.items.len(), 7);
    assert!(!snapshot.has_more);
    assert!(snapshot.items.iter().all(|post| post.get("user").is_some()));

    let mut table = TableView::users(source);
    table.load().await;
    table.set_search("name", "a").unwrap();
    let names: Vec<_> = table.view().iter().filter_map(|r| r.get_str("name")).collect();
    assert_eq!(names, vec!["Alice"]);
}

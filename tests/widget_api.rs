//! End-to-end widget pipeline tests against a mock roster API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use httpmock::MockServer;
use reqwest::Url;
use tempfile::tempdir;
use tower::ServiceExt;

use presenza::application::widget::{WidgetPayload, WidgetService};
use presenza::domain::fields::FieldFlags;
use presenza::domain::roster::{Dimension, RosterQuery};
use presenza::infra::cache::{CacheKey, FileCache};
use presenza::infra::http::{WidgetState, build_router};
use presenza::infra::upstream::RosterClient;

const THREE_ROWS: &str = r#"[
    {"name":"Trader","country":"SE","ingame":true,"idleTime":30,"channelName":"General"},
    {"name":"Doc","country":"DE","ingame":false,"idleTime":60,"channelName":"General"},
    {"name":"Enfo","country":"US","ingame":true,"idleTime":90,"channelName":"Raids"}
]"#;

fn widget_router(base: &str, cache: Option<Arc<FileCache>>) -> Router {
    let client = RosterClient::new(Url::parse(base).expect("base url"), Duration::from_secs(2))
        .expect("client");
    build_router(WidgetState {
        widget: Arc::new(WidgetService::new(client, cache)),
    })
}

async fn get(router: &Router, uri: &str) -> (StatusCode, WidgetPayload) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let payload = serde_json::from_slice(&bytes).expect("json envelope");
    (status, payload)
}

#[tokio::test]
async fn organization_request_fetches_renders_and_caches() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/org/1/12345");
        then.status(200)
            .header("content-type", "application/json")
            .body(THREE_ROWS);
    });

    let dir = tempdir().expect("tempdir");
    let cache = Arc::new(
        FileCache::open(dir.path().to_path_buf(), Duration::from_secs(300)).expect("cache opens"),
    );
    let router = widget_router(&server.base_url(), Some(cache));

    let uri = "/request?mode=2&dim=1&org=12345&fields=31";
    let (status, first) = get(&router, uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.html.matches("<tr class=").count(), 3);
    assert!(first.html.contains(r#"<table class="presenza organization">"#));
    assert!(!first.html.contains("Channel"));

    // The response is now cached under the composed key.
    let key = CacheKey::from_query(&RosterQuery {
        mode: 2,
        dimension: Dimension::First,
        organization: 12_345,
        fields: FieldFlags::from_mask(31),
    });
    assert!(dir.path().join(format!("{}.json", key.as_str())).exists());

    // A second identical request is served from the cache.
    let (_, second) = get(&router, uri).await;
    assert_eq!(second, first);
    mock.assert_hits(1);
}

#[tokio::test]
async fn online_request_includes_the_channel_column() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/online/0");
        then.status(200)
            .header("content-type", "application/json")
            .body(THREE_ROWS);
    });

    let router = widget_router(&server.base_url(), None);
    let (status, payload) = get(&router, "/request?mode=1&dim=0&fields=31").await;

    assert_eq!(status, StatusCode::OK);
    assert!(payload.html.contains(r#"<table class="presenza online">"#));
    assert!(payload.html.contains("<th>Channel</th>"));
    assert!(payload.html.contains("<td>General</td>"));
}

#[tokio::test]
async fn malformed_mode_degrades_to_an_empty_table() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.path_includes("/");
        then.status(200);
    });

    let router = widget_router(&server.base_url(), None);
    let (status, payload) = get(&router, "/request?mode=abc&dim=1&org=12345&fields=3").await;

    assert_eq!(status, StatusCode::OK);
    assert!(payload.html.contains("<table"));
    assert!(!payload.html.contains("<tr class="));
    mock.assert_hits(0);
}

#[tokio::test]
async fn bare_request_without_parameters_still_answers() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.path_includes("/");
        then.status(200);
    });

    let router = widget_router(&server.base_url(), None);
    let (status, payload) = get(&router, "/request").await;

    assert_eq!(status, StatusCode::OK);
    assert!(payload.html.contains("<tbody>"));
}

#[tokio::test]
async fn unreachable_upstream_degrades_to_a_header_only_table() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/online/0");
        then.status(503);
    });

    let router = widget_router(&server.base_url(), None);
    let (status, payload) = get(&router, "/request?mode=1&dim=0&fields=1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(payload.html.contains("<th>Name</th>"));
    assert!(!payload.html.contains("<tr class="));
}

#[tokio::test]
async fn health_probe_answers_no_content() {
    let server = MockServer::start();
    let router = widget_router(&server.base_url(), None);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/_health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn dispatcher_script_is_served_with_a_script_content_type() {
    let server = MockServer::start();
    let router = widget_router(&server.base_url(), None);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/static/public/presenza-widget.js")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.contains("javascript"));

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert!(!bytes.is_empty());
}

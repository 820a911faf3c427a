//! Integration tests for the ingestion endpoint.
//!
//! Uses `tower::ServiceExt::oneshot` to call the router without binding a
//! real TCP port; every test writes into its own temp directory.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use centrallog_api::server::{build_router, serve, AppState};
use centrallog_sink::LogFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt; // .oneshot()

const MISSING_FIELDS: &str = "Missing required fields: level, message, or service";

// ── Helper ────────────────────────────────────────────────────

fn make_state(dir: &TempDir) -> (Arc<AppState>, PathBuf) {
    let path = dir.path().join("microservices.log");
    (Arc::new(AppState::new(LogFile::new(&path))), path)
}

fn post_json(body: serde_json::Value) -> Request<Body> {
    post_raw(&body.to_string())
}

fn post_raw(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/log")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn read_log(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

// ── Success ───────────────────────────────────────────────────

#[tokio::test]
async fn valid_entry_returns_200_and_appends_line() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);
    let app = build_router(state);

    let body = serde_json::json!({"level": "error", "message": "db down", "service": "auth"});
    let resp = app.oneshot(post_json(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "Log received");

    let content = read_log(&path);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with("] [ERROR] [auth] db down"), "{}", lines[0]);
}

#[tokio::test]
async fn success_body_is_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = make_state(&dir);
    let body = serde_json::json!({"level": "info", "message": "m", "service": "s"});
    let resp = build_router(state).oneshot(post_json(body)).await.unwrap();
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
}

#[tokio::test]
async fn optional_tags_follow_supplied_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);
    let body = serde_json::json!({
        "level": "warn",
        "message": "slow query",
        "service": "orders",
        "timestamp": "2024-01-01T00:00:00.000Z",
        "requestId": "r-1",
        "statusCode": 0,
        "metadata": {"a": 1},
        "response": "ok"
    });
    let resp = build_router(state).oneshot(post_json(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        read_log(&path),
        "[2024-01-01T00:00:00.000Z] [WARN] [orders] [requestId: r-1] [status: 0] slow query \
         \nMetadata: {\n  \"a\": 1\n} \nResponse: ok\n"
    );
}

#[tokio::test]
async fn successive_requests_append() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);
    for i in 0..3 {
        let body = serde_json::json!({"level": "info", "message": format!("m{i}"), "service": "s"});
        let resp = build_router(Arc::clone(&state)).oneshot(post_json(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let content = read_log(&path);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" m0"));
    assert!(lines[2].ends_with(" m2"));
}

// ── Validation ────────────────────────────────────────────────

#[tokio::test]
async fn missing_required_fields_return_400_and_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);

    let bodies = [
        serde_json::json!({"message": "m", "service": "s"}),
        serde_json::json!({"level": null, "message": "m", "service": "s"}),
        serde_json::json!({"level": "info", "message": "", "service": "s"}),
        serde_json::json!({"level": "info", "message": "m"}),
        serde_json::json!({"level": "info", "message": "m", "service": ""}),
        serde_json::json!({}),
    ];

    for body in bodies {
        let resp = build_router(Arc::clone(&state))
            .oneshot(post_json(body.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let j: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(j, serde_json::json!({ "error": MISSING_FIELDS }));
    }

    assert!(!path.exists(), "log file must not be created by rejected requests");
}

#[tokio::test]
async fn malformed_json_returns_4xx() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);
    let resp = build_router(state).oneshot(post_raw("not-valid-json")).await.unwrap();
    assert!(resp.status().is_client_error(), "expected a 4xx for malformed JSON, got {}", resp.status());
    assert!(!path.exists());
}

#[tokio::test]
async fn wrongly_typed_field_returns_4xx() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);
    let body = serde_json::json!({"level": "info", "message": "m", "service": "s", "statusCode": "200"});
    let resp = build_router(state).oneshot(post_json(body)).await.unwrap();
    assert!(resp.status().is_client_error());
    assert!(!path.exists());
}

// ── Routing ───────────────────────────────────────────────────

#[tokio::test]
async fn other_paths_return_404() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = make_state(&dir);
    let req = Request::builder()
        .method(Method::POST)
        .uri("/logs")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let resp = build_router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_on_log_is_not_served() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = make_state(&dir);
    let req = Request::builder().method(Method::GET).uri("/log").body(Body::empty()).unwrap();
    let resp = build_router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ── Write failure ─────────────────────────────────────────────

#[tokio::test]
async fn write_failure_returns_500() {
    let dir = tempfile::tempdir().unwrap();
    // Directory was never created, so the append fails.
    let path = dir.path().join("never-created").join("microservices.log");
    let state = Arc::new(AppState::new(LogFile::new(&path)));

    let body = serde_json::json!({"level": "info", "message": "m", "service": "s"});
    let resp = build_router(state).oneshot(post_json(body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "Log write failed");
}

// ── Concurrency ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_posts_each_add_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);

    let mut handles = Vec::new();
    for i in 0..32 {
        let app = build_router(Arc::clone(&state));
        handles.push(tokio::spawn(async move {
            let body = serde_json::json!({
                "level": "info",
                "message": format!("req-{i}"),
                "service": format!("svc-{}", i % 4)
            });
            app.oneshot(post_json(body)).await.unwrap().status()
        }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap(), StatusCode::OK);
    }

    let content = read_log(&path);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 32);
    for i in 0..32 {
        let suffix = format!(" req-{i}");
        assert_eq!(lines.iter().filter(|l| l.ends_with(&suffix)).count(), 1);
    }
}

// ── Real socket ───────────────────────────────────────────────

#[tokio::test]
async fn serve_accepts_posts_over_tcp() {
    let dir = tempfile::tempdir().unwrap();
    let (state, path) = make_state(&dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let body = r#"{"level":"info","message":"over the wire","service":"tcp"}"#;
    let request = format!(
        "POST /log HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("Log received"));
    assert!(read_log(&path).ends_with("[INFO] [tcp] over the wire\n"));

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

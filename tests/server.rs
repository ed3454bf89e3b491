mod common;

use apiframe::server::{self, AppState};
use apiframe::{ApiframeClient, Operation, VideoRequest};
use common::{fast_backoff, mount_fetch, mount_submission};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the video service against `provider` and returns its address.
async fn start_service(provider: &MockServer, timeout: Duration) -> SocketAddr {
    let client = ApiframeClient::new_with_url("test_api_key".to_string(), &provider.uri()).unwrap();
    let poll = VideoRequest::default_config()
        .with_backoff(fast_backoff())
        .with_max_retries(1000)
        .with_timeout(timeout);
    let state = Arc::new(AppState::new(client).with_poll_config(poll));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, state));
    addr
}

async fn post_video(addr: SocketAddr) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/generate_video"))
        .json(&json!({ "prompt": "Explosion", "image_url": "https://example.com/cat.png" }))
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_generate_video_endpoint_returns_url() {
    let provider = MockServer::start().await;
    mount_submission(&provider, "luma-imagine", "vid").await;
    mount_fetch(
        &provider,
        "vid",
        json!({"status": "completed", "video_url": "https://cdn.example.com/vid.mp4"}),
    )
    .await;

    let addr = start_service(&provider, Duration::from_secs(30)).await;
    let (status, body) = post_video(addr).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({ "video_url": "https://cdn.example.com/vid.mp4" }));
}

#[tokio::test]
async fn test_generate_video_endpoint_times_out() {
    let provider = MockServer::start().await;
    mount_submission(&provider, "luma-imagine", "vid").await;
    mount_fetch(&provider, "vid", json!({"status": "processing", "percentage": 5})).await;

    let addr = start_service(&provider, Duration::from_millis(100)).await;
    let (status, body) = post_video(addr).await;

    assert_eq!(status, 408);
    assert_eq!(body["kind"], "timeout");
}

#[tokio::test]
async fn test_generate_video_endpoint_unexpected_status() {
    let provider = MockServer::start().await;
    mount_submission(&provider, "luma-imagine", "vid").await;
    mount_fetch(&provider, "vid", json!({"status": "failed"})).await;

    let addr = start_service(&provider, Duration::from_secs(30)).await;
    let (status, body) = post_video(addr).await;

    assert_eq!(status, 500);
    assert_eq!(body["kind"], "unexpected_status");
    assert!(body["detail"].as_str().unwrap().contains("failed"));
}

#[tokio::test]
async fn test_generate_video_endpoint_submission_rejected() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/luma-imagine"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&provider)
        .await;

    let addr = start_service(&provider, Duration::from_secs(30)).await;
    let (status, body) = post_video(addr).await;

    assert_eq!(status, 502);
    assert_eq!(body["kind"], "submission");
}

use apiframe::{ApiframeClient, ApiframeError, Progress};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_fetch_task_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fetch"))
        .and(header("Authorization", "test_api_key"))
        .and(body_json(json!({ "task_id": "abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task_id": "abc",
            "task_type": "imagine",
            "status": "processing",
            "percentage": 65
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiframeClient::new_with_url("test_api_key".to_string(), &server.uri()).unwrap();
    let snapshot = client.fetch_task("abc").await.unwrap();

    assert_eq!(snapshot.status.as_deref(), Some("processing"));
    assert_eq!(snapshot.progress, Some(Progress::Percent(65.0)));
    assert_eq!(snapshot.payload["task_type"], "imagine");
}

#[tokio::test]
async fn test_fetch_task_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fetch"))
        .respond_with(ResponseTemplate::new(404).set_body_string("task not found"))
        .mount(&server)
        .await;

    let client = ApiframeClient::new_with_url("test_api_key".to_string(), &server.uri()).unwrap();
    let err = client.fetch_task("missing").await.unwrap_err();

    match err {
        ApiframeError::ApiError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "task not found");
        }
        other => panic!("expected API error, got {other}"),
    }
}

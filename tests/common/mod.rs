#![allow(dead_code)]

use apiframe::{ApiframeError, Backoff, TaskTransport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A transport that replays scripted responses and counts calls.
///
/// Once the fetch script runs out, `fallback` is returned forever.
pub struct ScriptedTransport {
    submit: Mutex<Option<Result<Value, ApiframeError>>>,
    fetches: Mutex<VecDeque<Result<Value, ApiframeError>>>,
    fallback: Value,
    submit_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(submit: Result<Value, ApiframeError>) -> Self {
        Self {
            submit: Mutex::new(Some(submit)),
            fetches: Mutex::new(VecDeque::new()),
            fallback: json!({"status": "staged"}),
            submit_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub fn accepting(task_id: &str) -> Self {
        Self::new(Ok(json!({ "task_id": task_id })))
    }

    pub fn then(self, response: Value) -> Self {
        self.fetches.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn then_fail(self) -> Self {
        self.fetches.lock().unwrap().push_back(Err(ApiframeError::ApiError {
            status: 503,
            message: "upstream unavailable".into(),
        }));
        self
    }

    pub fn otherwise(mut self, fallback: Value) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskTransport for ScriptedTransport {
    async fn submit(&self, _endpoint: &str, _payload: &Value) -> Result<Value, ApiframeError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submit
            .lock()
            .unwrap()
            .take()
            .expect("submit called more than once")
    }

    async fn fetch(&self, _task_id: &str) -> Result<Value, ApiframeError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.fetches.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// Backoff short enough for tests against a real mock server.
pub fn fast_backoff() -> Backoff {
    Backoff::constant(Duration::from_millis(5))
}

/// Mounts a creation endpoint that issues `task_id`.
pub async fn mount_submission(server: &MockServer, endpoint: &str, task_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task_id": task_id })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a fetch response for `task_id` that is served once, ahead of any later mocks.
pub async fn mount_fetch_once(server: &MockServer, task_id: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path("/fetch"))
        .and(body_json(json!({ "task_id": task_id })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
}

/// Mounts a fetch response for `task_id` served on every call.
pub async fn mount_fetch(server: &MockServer, task_id: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path("/fetch"))
        .and(body_json(json!({ "task_id": task_id })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

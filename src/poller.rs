//! Submit a long-running task and poll it until it reaches a terminal status.
//!
//! The [`Poller`] is generic over a [`TaskTransport`], so the same loop drives
//! every operation (image generation, image-to-video, upscaling). Operations
//! differ only in their submission, their [`PollConfig`], and the extractor
//! that turns the final payload into a typed result.

use crate::error::ApiframeError;
use crate::types::TaskSnapshot;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

/// The two HTTP calls the poller needs from a provider.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    /// Sends `payload` to the creation endpoint `endpoint` and returns the raw response body.
    async fn submit(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiframeError>;

    /// Queries the status of `task_id` and returns the raw response body.
    async fn fetch(&self, task_id: &str) -> Result<Value, ApiframeError>;
}

#[async_trait]
impl<T: TaskTransport + ?Sized> TaskTransport for std::sync::Arc<T> {
    async fn submit(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiframeError> {
        (**self).submit(endpoint, payload).await
    }

    async fn fetch(&self, task_id: &str) -> Result<Value, ApiframeError> {
        (**self).fetch(task_id).await
    }
}

/// An operation-specific creation request.
#[derive(Debug, Clone)]
pub struct TaskSubmission {
    /// Path of the creation endpoint, relative to the provider's base URL.
    pub endpoint: String,
    pub payload: Value,
}

impl TaskSubmission {
    pub fn new(endpoint: impl Into<String>, payload: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            payload,
        }
    }
}

/// Exponential backoff: attempt `n` (0-indexed) waits `min(base * multiplier^n, cap)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub multiplier: f64,
    pub cap: Duration,
}

impl Backoff {
    pub const fn new(base: Duration, multiplier: f64, cap: Duration) -> Self {
        Self {
            base,
            multiplier,
            cap,
        }
    }

    /// 15s growing by 1.5x up to 4 minutes.
    pub const fn patient() -> Self {
        Self::new(Duration::from_secs(15), 1.5, Duration::from_secs(240))
    }

    /// 10s growing by 1.2x up to 1 minute.
    pub const fn brisk() -> Self {
        Self::new(Duration::from_secs(10), 1.2, Duration::from_secs(60))
    }

    /// The same delay before every attempt.
    pub const fn constant(delay: Duration) -> Self {
        Self::new(delay, 1.0, delay)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw = self.base.as_secs_f64() * self.multiplier.powi(exponent);
        // Overflow, infinity and NaN all fall back to the cap.
        Duration::try_from_secs_f64(raw).map_or(self.cap, |d| d.min(self.cap))
    }
}

/// How the poller classifies a reported status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Pending,
    Succeeded,
    Unexpected,
}

/// Budgets and status vocabulary for one poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub max_retries: u32,
    pub timeout: Duration,
    pub backoff: Backoff,
    pub pending_statuses: Vec<String>,
    pub success_statuses: Vec<String>,
    /// When false, unknown statuses are treated like pending ones.
    pub unknown_status_is_fatal: bool,
    /// When true, a fetch response without a `status` field counts as pending.
    pub missing_status_is_pending: bool,
}

impl PollConfig {
    pub fn new<I, S>(max_retries: u32, timeout: Duration, backoff: Backoff, success: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            max_retries,
            timeout,
            backoff,
            pending_statuses: vec!["staged".to_owned(), "processing".to_owned()],
            success_statuses: success.into_iter().map(Into::into).collect(),
            unknown_status_is_fatal: true,
            missing_status_is_pending: false,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_unknown_status_fatal(mut self, fatal: bool) -> Self {
        self.unknown_status_is_fatal = fatal;
        self
    }

    pub fn with_missing_status_pending(mut self, pending: bool) -> Self {
        self.missing_status_is_pending = pending;
        self
    }

    /// Classifies a reported status, where `None` means the field was absent.
    pub fn classify_reported(&self, status: Option<&str>) -> StatusClass {
        match status {
            None if self.missing_status_is_pending => StatusClass::Pending,
            status => self.classify(status.unwrap_or_default()),
        }
    }

    pub fn classify(&self, status: &str) -> StatusClass {
        if self.success_statuses.iter().any(|s| s == status) {
            StatusClass::Succeeded
        } else if self.pending_statuses.iter().any(|s| s == status) || !self.unknown_status_is_fatal
        {
            StatusClass::Pending
        } else {
            StatusClass::Unexpected
        }
    }

    pub fn validate(&self) -> Result<(), ApiframeError> {
        if self.max_retries == 0 {
            return Err(ApiframeError::InvalidConfig(
                "max_retries must be positive".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ApiframeError::InvalidConfig("timeout must be positive".into()));
        }
        if !(self.backoff.multiplier >= 1.0) {
            return Err(ApiframeError::InvalidConfig(format!(
                "backoff multiplier must be at least 1.0, got {}",
                self.backoff.multiplier
            )));
        }
        if self.success_statuses.is_empty() {
            return Err(ApiframeError::InvalidConfig(
                "at least one success status is required".into(),
            ));
        }
        Ok(())
    }
}

/// Returned by a result extractor when the field it needs is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

/// A task that reached a success status, with its extracted output.
#[derive(Debug, Clone)]
pub struct Completed<R> {
    pub task_id: String,
    pub output: R,
    /// The final fetch response, unmodified.
    pub payload: Value,
    /// Fetch calls made, including soft-retried failures.
    pub attempts: u32,
}

/// Drives the submit-then-poll loop over a [`TaskTransport`].
#[derive(Debug, Clone)]
pub struct Poller<T> {
    transport: T,
}

impl<T: TaskTransport> Poller<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits a task and waits for it to finish.
    ///
    /// Submission failures are always fatal. Once a task id is issued the
    /// call behaves like [`Poller::await_task`].
    ///
    /// # Errors
    ///
    /// - `ApiframeError::InvalidConfig` before any network call if `config` is invalid.
    /// - `ApiframeError::Submission` if the creation call fails or returns no `task_id`.
    /// - Any error returned by [`Poller::await_task`].
    pub async fn submit_and_await<R, F>(
        &self,
        submission: TaskSubmission,
        config: &PollConfig,
        extract: F,
    ) -> Result<Completed<R>, ApiframeError>
    where
        F: Fn(&Value) -> Result<R, MissingField> + Send + Sync,
    {
        config.validate()?;

        let response = self
            .transport
            .submit(&submission.endpoint, &submission.payload)
            .await
            .map_err(|e| ApiframeError::Submission {
                reason: e.to_string(),
            })?;

        let task_id = response
            .get("task_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiframeError::Submission {
                reason: format!("no task_id in response: {response}"),
            })?
            .to_owned();

        info!(task_id = %task_id, endpoint = %submission.endpoint, "task submitted");
        self.await_task(&task_id, config, extract).await
    }

    /// Polls an already-submitted task until it reaches a terminal status.
    ///
    /// The loop backs off before every fetch, including the first. Fetch
    /// failures are logged and consume one attempt; they never abort the loop.
    ///
    /// # Errors
    ///
    /// - `ApiframeError::UnexpectedStatus` as soon as an unknown status is seen.
    /// - `ApiframeError::MissingResult` if `extract` cannot find its field in a successful payload.
    /// - `ApiframeError::Timeout` if `config.timeout` elapsed first.
    /// - `ApiframeError::RetriesExhausted` if `config.max_retries` fetches were spent.
    pub async fn await_task<R, F>(
        &self,
        task_id: &str,
        config: &PollConfig,
        extract: F,
    ) -> Result<Completed<R>, ApiframeError>
    where
        F: Fn(&Value) -> Result<R, MissingField> + Send + Sync,
    {
        config.validate()?;

        let start = Instant::now();
        let mut attempt: u32 = 0;
        let mut last_status: Option<String> = None;

        while attempt < config.max_retries && start.elapsed() < config.timeout {
            let delay = config.backoff.delay(attempt);
            debug!(task_id, attempt = attempt + 1, ?delay, "backing off before fetch");
            sleep(delay).await;

            let snapshot = match self.transport.fetch(task_id).await {
                Ok(payload) => TaskSnapshot::from_payload(payload),
                Err(e) => {
                    warn!(task_id, attempt = attempt + 1, error = %e, "fetch failed, retrying");
                    attempt += 1;
                    continue;
                }
            };
            attempt += 1;

            let status = snapshot.status_str();
            match config.classify_reported(snapshot.status.as_deref()) {
                StatusClass::Pending => {
                    match &snapshot.progress {
                        Some(progress) => {
                            info!(task_id, attempt, status, %progress, "task in progress")
                        }
                        None => info!(task_id, attempt, status, "task in progress"),
                    }
                    last_status = snapshot.status;
                }
                StatusClass::Succeeded => {
                    let output = extract(&snapshot.payload).map_err(|MissingField(field)| {
                        ApiframeError::MissingResult {
                            task_id: task_id.to_owned(),
                            field,
                        }
                    })?;
                    info!(task_id, attempt, status, "task completed");
                    return Ok(Completed {
                        task_id: task_id.to_owned(),
                        output,
                        payload: snapshot.payload,
                        attempts: attempt,
                    });
                }
                StatusClass::Unexpected => {
                    error!(task_id, attempt, status, payload = %snapshot.payload, "unexpected task status");
                    return Err(ApiframeError::UnexpectedStatus {
                        task_id: task_id.to_owned(),
                        status: status.to_owned(),
                    });
                }
            }
        }

        let elapsed = start.elapsed();
        if elapsed >= config.timeout {
            Err(ApiframeError::Timeout {
                task_id: task_id.to_owned(),
                elapsed,
            })
        } else {
            Err(ApiframeError::RetriesExhausted {
                task_id: task_id.to_owned(),
                attempts: attempt,
                last_status,
            })
        }
    }
}

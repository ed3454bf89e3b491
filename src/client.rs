use crate::config::{Settings, API_KEY_VAR, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::error::ApiframeError;
use crate::operation::Operation;
use crate::poller::{Completed, PollConfig, Poller, TaskTransport};
use crate::types::{
    CreativeUpscaleRequest, FetchRequest, ImagineRequest, ImagineResult, TaskSnapshot,
    UpscaleRequest, UpscaleResult, VideoRequest, VideoResult,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::time::Duration;
use url::Url;

/// The main client for interacting with the APIFRAME API.
///
/// It holds the shared `reqwest::Client` and the base URL for all API requests.
/// It is cheap to clone and safe to share across tasks, so concurrent pollers
/// can each hold their own copy.
#[derive(Clone, Debug)]
pub struct ApiframeClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiframeClient {
    /// Creates a new `ApiframeClient`.
    ///
    /// This method initializes the client with an API key. It first checks for the `api_key`
    /// parameter. If it's `None`, it falls back to the `API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// - `ApiframeError::MissingApiKey` if the API key is not provided in either way.
    /// - `ApiframeError::RequestFailed` if the internal HTTP client fails to build.
    pub fn new(api_key: Option<String>) -> Result<Self, ApiframeError> {
        let api_key = api_key
            .or_else(|| env::var(API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiframeError::MissingApiKey)?;
        Self::build(&api_key, Url::parse(DEFAULT_API_URL)?, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a new `ApiframeClient` with a custom base URL.
    ///
    /// This is useful for testing or for connecting to a different API endpoint.
    ///
    /// # Errors
    ///
    /// - `ApiframeError::UrlParseFailed` if the provided `base_url` is invalid.
    pub fn new_with_url(api_key: String, base_url: &str) -> Result<Self, ApiframeError> {
        Self::new_with_timeout(api_key, base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Like [`ApiframeClient::new_with_url`], with an explicit per-request timeout.
    ///
    /// The timeout bounds each HTTP call on its own; a fetch that exceeds it
    /// fails and is retried by the poller like any other transport error.
    pub fn new_with_timeout(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ApiframeError> {
        Self::build(&api_key, Url::parse(base_url)?, timeout)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiframeError> {
        Self::build(
            &settings.api_key,
            settings.base_url.clone(),
            settings.request_timeout,
        )
    }

    fn build(api_key: &str, mut base_url: Url, timeout: Duration) -> Result<Self, ApiframeError> {
        // The provider expects the raw key, without a `Bearer` prefix.
        let mut auth = HeaderValue::from_str(api_key).map_err(|_| ApiframeError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        // `Url::join` replaces the last segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiframeError> {
        let url = self.base_url.join(path)?;
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ApiframeError::ApiError {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Retrieves a single snapshot of a task without polling.
    ///
    /// # Arguments
    ///
    /// * `task_id` - The identifier returned when the task was submitted.
    pub async fn fetch_task(&self, task_id: &str) -> Result<TaskSnapshot, ApiframeError> {
        let payload = self.fetch(task_id).await?;
        Ok(TaskSnapshot::from_payload(payload))
    }

    /// Submits `request` and polls it to completion with `config`.
    pub async fn run<O>(
        &self,
        request: &O,
        config: &PollConfig,
    ) -> Result<Completed<O::Output>, ApiframeError>
    where
        O: Operation + Sync,
    {
        let submission = request.submission()?;
        Poller::new(self.clone())
            .submit_and_await(submission, config, O::extract)
            .await
    }

    /// Polls a task submitted earlier, e.g. by a previous run, reading its result as `O`.
    pub async fn wait_for_task<O: Operation>(
        &self,
        task_id: &str,
        config: &PollConfig,
    ) -> Result<Completed<O::Output>, ApiframeError> {
        Poller::new(self.clone())
            .await_task(task_id, config, O::extract)
            .await
    }

    /// Generates images from a prompt using the default imagine profile.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use apiframe::{ApiframeClient, ImagineRequest};
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let client = ApiframeClient::new(None)?;
    /// let done = client.imagine(&ImagineRequest::new("a lighthouse at dusk", "3:2")).await?;
    /// for url in &done.output.image_urls {
    ///     println!("{url}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn imagine(
        &self,
        request: &ImagineRequest,
    ) -> Result<Completed<ImagineResult>, ApiframeError> {
        self.run(request, &ImagineRequest::default_config()).await
    }

    /// Animates an image into a video using the default video profile.
    pub async fn generate_video(
        &self,
        request: &VideoRequest,
    ) -> Result<Completed<VideoResult>, ApiframeError> {
        self.run(request, &VideoRequest::default_config()).await
    }

    pub async fn upscale(
        &self,
        request: &UpscaleRequest,
    ) -> Result<Completed<UpscaleResult>, ApiframeError> {
        self.run(request, &UpscaleRequest::default_config()).await
    }

    pub async fn upscale_creative(
        &self,
        request: &CreativeUpscaleRequest,
    ) -> Result<Completed<UpscaleResult>, ApiframeError> {
        self.run(request, &CreativeUpscaleRequest::default_config())
            .await
    }
}

#[async_trait]
impl TaskTransport for ApiframeClient {
    async fn submit(&self, endpoint: &str, payload: &Value) -> Result<Value, ApiframeError> {
        self.post_json(endpoint, payload).await
    }

    async fn fetch(&self, task_id: &str) -> Result<Value, ApiframeError> {
        self.post_json("fetch", &FetchRequest { task_id }).await
    }
}

//! The provider operations and how each one is submitted, polled, and read back.

use crate::error::ApiframeError;
use crate::poller::{Backoff, MissingField, PollConfig, TaskSubmission};
use crate::types::{
    CreativeUpscaleRequest, ImagineRequest, ImagineResult, UpscaleRequest, UpscaleResult,
    VideoRequest, VideoResult,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// A task-creating request together with everything the poller needs to finish it.
pub trait Operation: Serialize {
    /// The typed result extracted from the final payload.
    type Output;

    /// Path of the creation endpoint, relative to the base URL.
    const ENDPOINT: &'static str;

    /// Budgets and success vocabulary used when the caller has no preference.
    fn default_config() -> PollConfig;

    /// Reads the operation's result out of a successful fetch payload.
    fn extract(payload: &Value) -> Result<Self::Output, MissingField>;

    fn submission(&self) -> Result<TaskSubmission, ApiframeError> {
        Ok(TaskSubmission::new(Self::ENDPOINT, serde_json::to_value(self)?))
    }
}

fn non_empty_str<'a>(payload: &'a Value, field: &'static str) -> Result<&'a str, MissingField> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or(MissingField(field))
}

fn optional_str(payload: &Value, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn upscale_result(payload: &Value) -> Result<UpscaleResult, MissingField> {
    Ok(UpscaleResult {
        image_url: non_empty_str(payload, "image_url")?.to_owned(),
        task_type: optional_str(payload, "task_type"),
    })
}

impl Operation for ImagineRequest {
    type Output = ImagineResult;
    const ENDPOINT: &'static str = "imagine";

    fn default_config() -> PollConfig {
        PollConfig::new(
            20,
            Duration::from_secs(600),
            Backoff::patient(),
            ["finished", "completed"],
        )
    }

    fn extract(payload: &Value) -> Result<ImagineResult, MissingField> {
        let image_urls: Vec<String> = payload
            .get("image_urls")
            .and_then(Value::as_array)
            .map(|urls| {
                urls.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        if image_urls.is_empty() {
            return Err(MissingField("image_urls"));
        }
        Ok(ImagineResult {
            image_urls,
            original_image_url: optional_str(payload, "original_image_url"),
        })
    }
}

impl Operation for VideoRequest {
    type Output = VideoResult;
    const ENDPOINT: &'static str = "luma-imagine";

    fn default_config() -> PollConfig {
        PollConfig::new(
            30,
            Duration::from_secs(1800),
            Backoff::brisk(),
            ["completed", "finished", "success"],
        )
    }

    fn extract(payload: &Value) -> Result<VideoResult, MissingField> {
        Ok(VideoResult {
            video_url: non_empty_str(payload, "video_url")?.to_owned(),
        })
    }
}

impl Operation for UpscaleRequest {
    type Output = UpscaleResult;
    const ENDPOINT: &'static str = "upscale-1x";

    fn default_config() -> PollConfig {
        PollConfig::new(
            20,
            Duration::from_secs(600),
            Backoff::patient(),
            ["finished", "completed", "success"],
        )
        .with_missing_status_pending(true)
    }

    fn extract(payload: &Value) -> Result<UpscaleResult, MissingField> {
        upscale_result(payload)
    }
}

impl Operation for CreativeUpscaleRequest {
    type Output = UpscaleResult;
    const ENDPOINT: &'static str = "upscale-alt";

    fn default_config() -> PollConfig {
        PollConfig::new(
            30,
            Duration::from_secs(600),
            Backoff::brisk(),
            ["finished", "success"],
        )
        .with_missing_status_pending(true)
    }

    fn extract(payload: &Value) -> Result<UpscaleResult, MissingField> {
        upscale_result(payload)
    }
}

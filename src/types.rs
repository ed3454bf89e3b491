use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A request to generate a grid of images from a text prompt.
#[derive(Serialize, Debug, Clone)]
pub struct ImagineRequest {
    /// A text description of the images to generate.
    pub prompt: String,
    /// The aspect ratio of the output, e.g. "1:1" or "3:2".
    pub aspect_ratio: String,
    /// An optional URL the provider calls back when the task finishes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Secret echoed back to the webhook for verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,
}

impl ImagineRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: aspect_ratio.into(),
            webhook_url: None,
            webhook_secret: None,
        }
    }
}

/// A request to animate a still image into a short video.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VideoRequest {
    /// What should happen in the video.
    pub prompt: String,
    /// A publicly reachable URL of the source image.
    pub image_url: String,
    /// Let the provider rewrite the prompt before generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhance_prompt: Option<bool>,
}

impl VideoRequest {
    pub fn new(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_url: image_url.into(),
            enhance_prompt: None,
        }
    }
}

/// A request to upscale one image out of a previously generated grid.
#[derive(Serialize, Debug, Clone)]
pub struct UpscaleRequest {
    /// The task id of the generation that produced the grid.
    pub parent_task_id: String,
    /// The 1-based position of the image in the grid, sent as a string.
    pub index: String,
}

impl UpscaleRequest {
    pub fn new(parent_task_id: impl Into<String>, index: u8) -> Self {
        Self {
            parent_task_id: parent_task_id.into(),
            index: index.to_string(),
        }
    }
}

/// The flavour of an alternative upscale.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpscaleType {
    Subtle,
    Creative,
}

/// A request for a creative or subtle upscale of a previously generated image.
#[derive(Serialize, Debug, Clone)]
pub struct CreativeUpscaleRequest {
    pub parent_task_id: String,
    #[serde(rename = "type")]
    pub type_: UpscaleType,
}

impl CreativeUpscaleRequest {
    pub fn new(parent_task_id: impl Into<String>, type_: UpscaleType) -> Self {
        Self {
            parent_task_id: parent_task_id.into(),
            type_,
        }
    }
}

/// (Internal) The body of every fetch call.
#[derive(Serialize, Debug)]
pub(crate) struct FetchRequest<'a> {
    pub(crate) task_id: &'a str,
}

/// The generated images of a finished imagine task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagineResult {
    pub image_urls: Vec<String>,
    /// The combined grid image, when the provider returns one.
    pub original_image_url: Option<String>,
}

/// The rendered clip of a finished image-to-video task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub video_url: String,
}

/// The output of a finished upscale task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpscaleResult {
    pub image_url: String,
    pub task_type: Option<String>,
}

/// Task progress as reported by the provider.
///
/// The provider sends either a number or a placeholder string such as `"N/A"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Progress {
    Percent(f64),
    Label(String),
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Percent(p) => write!(f, "{p}%"),
            Progress::Label(label) => f.write_str(label),
        }
    }
}

/// One observation of a task, as returned by a single fetch call.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    /// The reported status, if the payload carried one.
    pub status: Option<String>,
    pub progress: Option<Progress>,
    /// The complete fetch response, including operation-specific fields.
    pub payload: Value,
}

impl TaskSnapshot {
    pub fn from_payload(payload: Value) -> Self {
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let progress = payload
            .get("percentage")
            .and_then(|p| serde_json::from_value(p.clone()).ok());
        Self {
            status,
            progress,
            payload,
        }
    }

    /// The reported status, or an empty string when the field was absent.
    pub fn status_str(&self) -> &str {
        self.status.as_deref().unwrap_or_default()
    }
}

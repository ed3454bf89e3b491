//! Plain-text summaries of completed tasks.

use crate::error::ApiframeError;
use crate::poller::Completed;
use crate::types::{ImagineResult, UpscaleResult, VideoResult};
use std::fmt;
use std::path::Path;
use tokio::fs;

impl fmt::Display for Completed<ImagineResult> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Imagine Task ID: {}", self.task_id)?;
        writeln!(
            f,
            "Original Image URL: {}",
            self.output.original_image_url.as_deref().unwrap_or_default()
        )?;
        writeln!(f, "Generated Image URLs:")?;
        for url in &self.output.image_urls {
            writeln!(f, "{url}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Completed<VideoResult> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Video Task ID: {}", self.task_id)?;
        writeln!(f, "Video URL: {}", self.output.video_url)
    }
}

impl fmt::Display for Completed<UpscaleResult> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Upscale Task ID: {}", self.task_id)?;
        writeln!(f, "Upscaled Image URL: {}", self.output.image_url)?;
        if let Some(task_type) = &self.output.task_type {
            writeln!(f, "Task Type: {task_type}")?;
        }
        Ok(())
    }
}

/// Writes `summary` to `path`, creating parent directories and replacing any existing file.
pub async fn write_summary<P, S>(path: P, summary: &S) -> Result<(), ApiframeError>
where
    P: AsRef<Path>,
    S: fmt::Display + ?Sized,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, summary.to_string()).await?;
    tracing::info!(path = %path.display(), "summary written");
    Ok(())
}

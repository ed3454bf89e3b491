//! Upscales one image of a finished imagine task and saves the URL to `upscaled_image_url.txt`.
//!
//! To run this example, you must have the `API_KEY` environment variable set.
//!
//! Usage:
//! `cargo run --example upscale -- <PARENT_TASK_ID> <INDEX>`

use apiframe::output::write_summary;
use apiframe::{ApiframeClient, Settings, UpscaleRequest};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let client = ApiframeClient::from_settings(&Settings::from_env()?)?;

    let parent_task_id = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Please provide the parent task ID."))?;
    let index: u8 = env::args()
        .nth(2)
        .unwrap_or_else(|| "1".to_string())
        .parse()?;
    anyhow::ensure!((1..=4).contains(&index), "INDEX must be between 1 and 4");

    let done = client
        .upscale(&UpscaleRequest::new(parent_task_id, index))
        .await?;

    print!("{done}");
    write_summary("upscaled_image_url.txt", &done).await?;

    Ok(())
}

//! Runs a creative (or subtle) upscale and saves the URL to `upscaled_creative_url.txt`.
//!
//! To run this example, you must have the `API_KEY` environment variable set.
//!
//! Usage:
//! `cargo run --example upscale_creative -- <PARENT_TASK_ID> [creative|subtle]`

use apiframe::output::write_summary;
use apiframe::{ApiframeClient, CreativeUpscaleRequest, Settings, UpscaleType};
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
    let type_ = match env::args().nth(2).as_deref() {
        None | Some("creative") => UpscaleType::Creative,
        Some("subtle") => UpscaleType::Subtle,
        Some(other) => anyhow::bail!("Unknown upscale type `{other}`"),
    };

    let done = client
        .upscale_creative(&CreativeUpscaleRequest::new(parent_task_id, type_))
        .await?;

    print!("{done}");
    write_summary("upscaled_creative_url.txt", &done).await?;

    Ok(())
}

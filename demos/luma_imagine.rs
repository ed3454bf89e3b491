//! Turns a still image into a short video and saves the URL to `video_url.txt`.
//!
//! To run this example, you must have the `API_KEY` environment variable set.
//!
//! Usage:
//! `cargo run --example luma_imagine -- "<PROMPT>" <IMAGE_URL> [--enhance]`

use apiframe::output::write_summary;
use apiframe::{ApiframeClient, ApiframeError, Settings, VideoRequest};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let client = ApiframeClient::from_settings(&Settings::from_env()?)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let [prompt, image_url, rest @ ..] = args.as_slice() else {
        anyhow::bail!("Usage: luma_imagine <PROMPT> <IMAGE_URL> [--enhance]");
    };

    let mut request = VideoRequest::new(prompt.as_str(), image_url.as_str());
    request.enhance_prompt = Some(rest.iter().any(|a| a == "--enhance"));

    match client.generate_video(&request).await {
        Ok(done) => {
            print!("{done}");
            write_summary("video_url.txt", &done).await?;
        }
        Err(e @ ApiframeError::Timeout { .. }) => {
            eprintln!("Gave up waiting: {e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

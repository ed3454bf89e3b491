//! Generates a grid of images from a prompt and saves the URLs to `image_urls.txt`.
//!
//! To run this example, you must have the `API_KEY` environment variable set.
//!
//! Usage:
//! `cargo run --example imagine -- "<PROMPT>" [ASPECT_RATIO]`

use apiframe::output::write_summary;
use apiframe::{ApiframeClient, ImagineRequest, Settings};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let client = ApiframeClient::from_settings(&Settings::from_env()?)?;

    let prompt = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Please provide a prompt as the first argument."))?;
    let aspect_ratio = env::args().nth(2).unwrap_or_else(|| "3:2".to_string());

    let done = client
        .imagine(&ImagineRequest::new(prompt, aspect_ratio))
        .await?;

    print!("{done}");
    write_summary("image_urls.txt", &done).await?;
    println!("Image URLs saved to image_urls.txt");

    Ok(())
}

//! Runs the video generation service.
//!
//! Reads `API_KEY` (required) and the optional `APIFRAME_*` variables, from a
//! `.env` file if present.
//!
//! Usage:
//! `cargo run --bin video-server`

use apiframe::server::{self, AppState};
use apiframe::{ApiframeClient, Settings};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Fail fast on a missing key before accepting any request.
    let settings = Settings::from_env()?;
    let client = ApiframeClient::from_settings(&settings)?;
    let state = Arc::new(AppState::new(client));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    server::serve(listener, state).await?;
    Ok(())
}

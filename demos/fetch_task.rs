//! Prints the current status of an existing task.
//!
//! Usage:
//! `cargo run --example fetch_task <TASK_ID>`

use apiframe::{ApiframeClient, Settings};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let client = ApiframeClient::from_settings(&Settings::from_env()?)?;

    let task_id = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Please provide a task ID as a command-line argument."))?;

    let snapshot = client.fetch_task(&task_id).await?;
    println!(
        "Task `{}`: status {}, progress {}",
        task_id,
        snapshot.status.as_deref().unwrap_or("unknown"),
        snapshot
            .progress
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("{}", serde_json::to_string_pretty(&snapshot.payload)?);

    Ok(())
}

//! services/twin/src/bin/twin.rs
//!
//! Runs the scripted demo session and prints the resulting report as JSON.

use std::sync::Arc;
use tracing::info;
use twin_lib::{config::Config, demo, error::AppError, init_tracing, state::AppState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    init_tracing(&config);
    info!(backend = ?config.storage_backend, "Configuration loaded. Starting demo session...");

    // --- 2. Connect Storage & Build State ---
    let state = AppState::from_config(config).await?;

    // --- 3. Run the Session ---
    let report = demo::run(&state).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Demo session complete.");
    Ok(())
}

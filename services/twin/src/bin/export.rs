//! services/twin/src/bin/export.rs
//!
//! Writes the stored key space to `EXPORT_PATH` as pretty-printed JSON.

use tracing::info;
use twin_lib::{config::Config, error::AppError, export, init_tracing, state};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;
    init_tracing(&config);

    let storage = state::connect_storage(&config).await?;
    let document = export::snapshot(storage.as_ref()).await?;
    std::fs::write(&config.export_path, serde_json::to_string_pretty(&document)?)?;

    info!(path = %config.export_path.display(), "Local storage exported.");
    Ok(())
}

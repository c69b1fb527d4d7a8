pub mod balance;
pub mod commands;
pub mod config;
pub mod db;
pub mod injury;
pub mod intensity;
pub mod logging;
pub mod models;
pub mod recommendation;
pub mod stats;

#[cfg(test)]
mod test_utils;

use config::CoachConfig;
use db::{AppState, StoreError};

/// Open the configured database and build the shared state
pub async fn open(config: CoachConfig) -> Result<AppState, StoreError> {
  let pool = db::initialize_db(&config).await?;
  tracing::info!("Database ready");
  Ok(AppState { db: pool, config })
}

// Migration orchestrator
// Migrations are embedded in the binary and run at startup unless disabled

pub mod diesel;

use thiserror::Error;
use tracing::{error, info};

use crate::app_config::AppConfig;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Failed to establish migration connection: {0}")]
    Connection(String),

    #[error("Migration failed: {0}")]
    Failed(String),
}

/// Whether startup should apply embedded migrations
pub fn should_run_migrations(config: &AppConfig) -> bool {
    !config.disable_embedded_migrations
}

/// Apply pending migrations, logging the outcome
pub async fn run_all_migrations(config: &AppConfig) -> Result<usize, MigrationError> {
    info!(
        "[MIGRATIONS] Starting migration process for environment: {}",
        config.server.environment
    );

    match diesel::run_migrations(&config.database.url).await {
        Ok(0) => {
            info!("[MIGRATIONS] Schema up to date");
            Ok(0)
        },
        Ok(applied) => {
            info!("[MIGRATIONS] Applied {} migrations", applied);
            Ok(applied)
        },
        Err(e) => {
            error!("[MIGRATIONS] Migration failed: {}", e);
            Err(e)
        },
    }
}

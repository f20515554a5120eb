// Diesel migration runner for MySQL
// MigrationHarness is sync, so it runs on a blocking thread through AsyncConnectionWrapper

use diesel::Connection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::AsyncMysqlConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info};

use super::MigrationError;

// Embed migrations at compile time
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type SyncMysqlConnection = AsyncConnectionWrapper<AsyncMysqlConnection>;

/// Run all pending migrations and return how many were applied
pub async fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    info!("[DIESEL] Starting migration process...");
    let database_url = database_url.to_string();

    let applied = tokio::task::spawn_blocking(move || -> Result<usize, MigrationError> {
        let mut conn = SyncMysqlConnection::establish(&database_url)
            .map_err(|e| MigrationError::Connection(e.to_string()))?;

        let pending = conn
            .pending_migrations(MIGRATIONS)
            .map_err(|e| MigrationError::Failed(e.to_string()))?;
        if pending.is_empty() {
            debug!("[DIESEL] No pending migrations found");
            return Ok(0);
        }
        info!("[DIESEL] Found {} pending migrations", pending.len());

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| MigrationError::Failed(e.to_string()))?;
        for migration in &applied {
            debug!("[DIESEL] Applied migration: {}", migration);
        }

        Ok(applied.len())
    })
    .await
    .map_err(|e| MigrationError::Failed(format!("migration task panicked: {}", e)))??;

    info!("[DIESEL] Applied {} migrations", applied);
    Ok(applied)
}

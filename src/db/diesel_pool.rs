// Diesel-async MySQL connection pool backed by bb8

use bb8::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncMysqlConnection;
use std::time::Duration;

use crate::app_config::DatabaseConfig;
use crate::db::store::RepositoryError;

pub type DieselPool = Pool<AsyncDieselConnectionManager<AsyncMysqlConnection>>;

/// Pool settings derived from `DatabaseConfig`
#[derive(Debug, Clone)]
pub struct DieselDatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub test_on_checkout: bool,
}

impl From<&DatabaseConfig> for DieselDatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connection_timeout: Duration::from_secs(config.connect_timeout),
            idle_timeout: Duration::from_secs(config.idle_timeout),
            max_lifetime: Duration::from_secs(config.max_lifetime),
            test_on_checkout: true,
        }
    }
}

/// Create the pool and check out one connection to fail fast on bad credentials
pub async fn create_diesel_pool(config: DieselDatabaseConfig) -> Result<DieselPool, RepositoryError> {
    let manager = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(config.url.clone());

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .min_idle(Some(config.min_connections))
        .connection_timeout(config.connection_timeout)
        .idle_timeout(Some(config.idle_timeout))
        .max_lifetime(Some(config.max_lifetime))
        .test_on_check_out(config.test_on_checkout)
        .build(manager)
        .await
        .map_err(|e| RepositoryError::Pool(e.to_string()))?;

    let conn = pool.get().await?;
    drop(conn);

    tracing::info!(
        "MySQL pool initialized for {} with {} max connections",
        mask_connection_string(&config.url),
        config.max_connections
    );

    Ok(pool)
}

/// Mask credentials in a database URL for logging
pub fn mask_connection_string(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("***");
            let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

            if parsed.username().is_empty() && parsed.password().is_none() {
                format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path())
            } else {
                format!("{}://***:***@{}{}{}", parsed.scheme(), host, port, parsed.path())
            }
        },
        Err(_) => "mysql://***:***@***".to_string(),
    }
}

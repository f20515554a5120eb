// Library exports for the RTI backend
// main.rs and the integration tests both build the service through this crate

pub mod app;
pub mod app_config;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, ConfigError};
pub use config::RateLimitingConfig;
pub use db::{DieselPool, DieselStore, RepositoryError, Store};
pub use handlers::health::health_check;
pub use middleware::AuthenticatedUser;
pub use services::{JwtService, RateLimitService};
pub use utils::{ApiError, ApiResponse, ApiResult};

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Database pool initialization failed: {0}")]
    Pool(#[from] RepositoryError),

    #[error(transparent)]
    Migration(#[from] migrations::MigrationError),
}

/// Connect to MySQL, apply migrations and wire services
pub async fn initialize_app_state(config: AppConfig) -> Result<AppState, StartupError> {
    info!(
        "Connecting to {}",
        db::mask_connection_string(&config.database.url)
    );
    let pool = db::create_diesel_pool(db::DieselDatabaseConfig::from(&config.database)).await?;

    if migrations::should_run_migrations(&config) {
        migrations::run_all_migrations(&config).await?;
    } else {
        info!("[MIGRATIONS] Embedded migrations disabled");
    }

    let store: Arc<dyn Store> = Arc::new(DieselStore::new(pool));
    Ok(AppState::new(config, store))
}

fn security_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

/// The full HTTP service: routes, auth, rate limiting, CORS, security headers, tracing
pub fn build_router(state: AppState) -> Router {
    let production = state.config.is_production();

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", handlers::api_routes())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::error_detail_middleware,
        ))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::rate_limit_middleware,
        ))
        .layer(from_fn_with_state(state.clone(), middleware::cors_middleware))
        .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .layer(security_header(header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .layer(security_header(header::REFERRER_POLICY, "no-referrer"))
        .layer(security_header(header::X_DNS_PREFETCH_CONTROL, "off"));

    let router = if production {
        router.layer(security_header(
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=31536000; includeSubDomains",
        ))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

/// Liveness plus a database round trip
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service healthy"),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let (healthy, database) = match state.store.ping().await {
        Ok(()) => (true, json!({ "status": "healthy", "error": null })),
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            let error = if state.config.is_production() {
                "Database connection failed".to_string()
            } else {
                format!("Database connection failed: {}", e)
            };
            (false, json!({ "status": "unhealthy", "error": error }))
        },
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "rti-backend",
        "environment": state.config.server.environment.to_string(),
        "timestamp": timestamp,
        "components": { "database": database }
    });

    if healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

// HTTP handlers and route builders

pub mod applications;
pub mod auth;
pub mod callback_requests;
pub mod consultations;
pub mod health;
pub mod openapi;
pub mod states;

use crate::app::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

// Authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/public", post(applications::submit_public))
        .route("/", post(applications::submit).get(applications::list))
        .route("/mine", get(applications::list_mine))
        .route("/stats", get(applications::stats))
        .route(
            "/{id}",
            get(applications::get)
                .put(applications::update)
                .delete(applications::delete),
        )
        .route(
            "/{id}/status",
            put(applications::update_status).patch(applications::update_status),
        )
}

pub fn consultation_routes() -> Router<AppState> {
    Router::new()
        .route("/public", post(consultations::create_public))
        .route("/", get(consultations::list))
        .route(
            "/{id}",
            get(consultations::get).delete(consultations::delete),
        )
        .route(
            "/{id}/status",
            put(consultations::update_status).patch(consultations::update_status),
        )
}

pub fn callback_request_routes() -> Router<AppState> {
    Router::new()
        .route("/public", post(callback_requests::create_public))
        .route("/", get(callback_requests::list))
        .route(
            "/{id}",
            get(callback_requests::get).delete(callback_requests::delete),
        )
        .route(
            "/{id}/status",
            put(callback_requests::update_status).patch(callback_requests::update_status),
        )
}

// `{key}` serves the slug lookup on GET and the id-addressed admin writes
pub fn state_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(states::list).post(states::create))
        .route(
            "/{key}",
            get(states::get_by_slug)
                .put(states::update)
                .delete(states::delete),
        )
}

/// Every `/api/v1` route
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/rti-applications", application_routes())
        .nest("/consultations", consultation_routes())
        .nest("/callback-requests", callback_request_routes())
        .nest("/states", state_routes())
        .route("/docs/openapi.json", get(openapi::serve_openapi_document))
}

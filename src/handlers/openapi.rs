// OpenAPI document assembled from the handler annotations

use axum::Json;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{applications, auth, callback_requests, consultations, health, states};
use crate::models::{
    ApplicationStats, ApplicationStatus, AuthResponse, CallbackRequest, Consultation,
    CreateCallbackRequest, CreateConsultationRequest, CreateRtiApplicationRequest,
    CreateStateRequest, LeadStatus, LoginRequest, RegisterRequest, Role, RtiApplication, State,
    StatusUpdateRequest, UpdateRtiApplicationRequest, UpdateStateRequest, UserProfile,
};
use crate::utils::FieldError;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RTI Filing Service API",
        description = "Submission and processing of RTI applications, consultation leads and callback requests",
        version = "1.0.0"
    ),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        applications::submit_public,
        applications::submit,
        applications::list,
        applications::list_mine,
        applications::stats,
        applications::get,
        applications::update,
        applications::update_status,
        applications::delete,
        consultations::create_public,
        consultations::list,
        consultations::get,
        consultations::update_status,
        consultations::delete,
        callback_requests::create_public,
        callback_requests::list,
        callback_requests::get,
        callback_requests::update_status,
        callback_requests::delete,
        states::list,
        states::get_by_slug,
        states::create,
        states::update,
        states::delete,
    ),
    components(schemas(
        ApplicationStats,
        ApplicationStatus,
        AuthResponse,
        CallbackRequest,
        Consultation,
        CreateCallbackRequest,
        CreateConsultationRequest,
        CreateRtiApplicationRequest,
        CreateStateRequest,
        FieldError,
        LeadStatus,
        LoginRequest,
        RegisterRequest,
        Role,
        RtiApplication,
        State,
        StatusUpdateRequest,
        UpdateRtiApplicationRequest,
        UpdateStateRequest,
        UserProfile,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "RTI Applications", description = "RTI application submission and processing"),
        (name = "Consultations", description = "Consultation leads"),
        (name = "Callback Requests", description = "Phone callback leads"),
        (name = "States", description = "State reference data"),
        (name = "Authentication", description = "Account registration and login"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON at /api/v1/docs/openapi.json
pub async fn serve_openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_public_submission_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/rti-applications/public",
            "/api/v1/consultations/public",
            "/api/v1/callback-requests/public",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearerAuth"));
    }
}

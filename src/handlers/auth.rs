// Authentication handlers: register, login, current user

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::{
    app::AppState,
    middleware::AuthenticatedUser,
    models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile},
    utils::{ApiError, ApiResponse, ApiResult},
};

/// Register a new applicant account
/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    operation_id = "register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let auth = state.auth_service.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Registration successful", auth)),
    ))
}

/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    operation_id = "login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<AuthResponse>>> {
    let auth = state.auth_service.login(request).await?;
    Ok(Json(ApiResponse::success("Login successful", auth)))
}

/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    operation_id = "getCurrentUser",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearerAuth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> ApiResult<Json<ApiResponse<UserProfile>>> {
    let profile = state.auth_service.me(user.user_id).await?;
    Ok(Json(ApiResponse::success("User retrieved", profile)))
}

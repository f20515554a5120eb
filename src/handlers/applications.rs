// RTI application endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    app::AppState,
    middleware::{AdminUser, AuthenticatedUser},
    models::{
        ApplicationFilter, ApplicationStats, CreateRtiApplicationRequest, OwnApplicationFilter,
        Paginated, Pagination, RtiApplication, StatusUpdateRequest, UpdateRtiApplicationRequest,
    },
    utils::{ApiError, ApiResponse, ApiResult},
};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

/// Submit an RTI application without an account
/// POST /api/v1/rti-applications/public
#[utoipa::path(
    post,
    path = "/api/v1/rti-applications/public",
    tag = "RTI Applications",
    operation_id = "submitPublicApplication",
    request_body = CreateRtiApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = RtiApplication),
        (status = 400, description = "Validation failed"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn submit_public(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateRtiApplicationRequest>, ApiError>,
) -> ApiResult<Created<RtiApplication>> {
    let application = state.application_service.submit(request, None).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("RTI application submitted successfully", application)),
    ))
}

/// Submit an RTI application owned by the caller
/// POST /api/v1/rti-applications
#[utoipa::path(
    post,
    path = "/api/v1/rti-applications",
    tag = "RTI Applications",
    operation_id = "submitApplication",
    request_body = CreateRtiApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = RtiApplication),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearerAuth" = []))
)]
pub async fn submit(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Json(request), _): WithRejection<Json<CreateRtiApplicationRequest>, ApiError>,
) -> ApiResult<Created<RtiApplication>> {
    let application = state
        .application_service
        .submit(request, Some(&user))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("RTI application submitted successfully", application)),
    ))
}

/// List all applications
/// GET /api/v1/rti-applications
#[utoipa::path(
    get,
    path = "/api/v1/rti-applications",
    tag = "RTI Applications",
    operation_id = "listApplications",
    params(ApplicationFilter, Pagination),
    responses(
        (status = 200, description = "Page of applications, newest first"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearerAuth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Query(filter), _): WithRejection<Query<ApplicationFilter>, ApiError>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, ApiError>,
) -> ApiResult<Json<ApiResponse<Paginated<RtiApplication>>>> {
    let page = state.application_service.list(&filter, pagination).await?;
    Ok(Json(ApiResponse::success("RTI applications retrieved", page)))
}

/// The caller's own applications
/// GET /api/v1/rti-applications/mine
#[utoipa::path(
    get,
    path = "/api/v1/rti-applications/mine",
    tag = "RTI Applications",
    operation_id = "listMyApplications",
    params(OwnApplicationFilter, Pagination),
    responses(
        (status = 200, description = "Page of the caller's applications"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Query(filter), _): WithRejection<Query<OwnApplicationFilter>, ApiError>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, ApiError>,
) -> ApiResult<Json<ApiResponse<Paginated<RtiApplication>>>> {
    let page = state
        .application_service
        .list_mine(&user, filter, pagination)
        .await?;
    Ok(Json(ApiResponse::success("RTI applications retrieved", page)))
}

/// Count of applications per status
/// GET /api/v1/rti-applications/stats
#[utoipa::path(
    get,
    path = "/api/v1/rti-applications/stats",
    tag = "RTI Applications",
    operation_id = "applicationStats",
    responses(
        (status = 200, description = "Counts by status", body = ApplicationStats),
        (status = 403, description = "Admin role required")
    ),
    security(("bearerAuth" = []))
)]
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<ApiResponse<ApplicationStats>>> {
    let stats = state.application_service.stats().await?;
    Ok(Json(ApiResponse::success("RTI application statistics", stats)))
}

/// GET /api/v1/rti-applications/{id}
#[utoipa::path(
    get,
    path = "/api/v1/rti-applications/{id}",
    tag = "RTI Applications",
    operation_id = "getApplication",
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application", body = RtiApplication),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ApiResponse<RtiApplication>>> {
    let application = state.application_service.get(id, &user).await?;
    Ok(Json(ApiResponse::success("RTI application retrieved", application)))
}

/// Edit applicant details
/// PUT /api/v1/rti-applications/{id}
#[utoipa::path(
    put,
    path = "/api/v1/rti-applications/{id}",
    tag = "RTI Applications",
    operation_id = "updateApplication",
    params(("id" = i64, Path, description = "Application ID")),
    request_body = UpdateRtiApplicationRequest,
    responses(
        (status = 200, description = "Updated application", body = RtiApplication),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateRtiApplicationRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<RtiApplication>>> {
    let application = state
        .application_service
        .update_details(id, request, &user)
        .await?;
    Ok(Json(ApiResponse::success("RTI application updated", application)))
}

/// PATCH|PUT /api/v1/rti-applications/{id}/status
#[utoipa::path(
    patch,
    path = "/api/v1/rti-applications/{id}/status",
    tag = "RTI Applications",
    operation_id = "updateApplicationStatus",
    params(("id" = i64, Path, description = "Application ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = RtiApplication),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<StatusUpdateRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<RtiApplication>>> {
    let application = state
        .application_service
        .update_status(id, request, &admin)
        .await?;
    Ok(Json(ApiResponse::success("Status updated successfully", application)))
}

/// DELETE /api/v1/rti-applications/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/rti-applications/{id}",
    tag = "RTI Applications",
    operation_id = "deleteApplication",
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.application_service.delete(id, &user).await?;
    Ok(Json(ApiResponse::message("RTI application deleted")))
}

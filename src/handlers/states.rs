// State reference data endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    app::AppState,
    middleware::AdminUser,
    models::{CreateStateRequest, State as StateRecord, UpdateStateRequest},
    utils::{ApiError, ApiResponse, ApiResult},
};

/// Active states ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/states",
    tag = "States",
    operation_id = "listStates",
    responses((status = 200, description = "Active states", body = [crate::models::State]))
)]
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<StateRecord>>>> {
    let states = state.state_service.list_active().await?;
    Ok(Json(ApiResponse::success("States retrieved", states)))
}

#[utoipa::path(
    get,
    path = "/api/v1/states/{slug}",
    tag = "States",
    operation_id = "getState",
    params(("slug" = String, Path, description = "State slug, e.g. `maharashtra`")),
    responses(
        (status = 200, description = "State", body = crate::models::State),
        (status = 404, description = "Unknown slug")
    )
)]
pub async fn get_by_slug(
    State(state): State<AppState>,
    WithRejection(Path(slug), _): WithRejection<Path<String>, ApiError>,
) -> ApiResult<Json<ApiResponse<StateRecord>>> {
    let record = state.state_service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success("State retrieved", record)))
}

#[utoipa::path(
    post,
    path = "/api/v1/states",
    tag = "States",
    operation_id = "createState",
    request_body = CreateStateRequest,
    responses(
        (status = 201, description = "State created", body = crate::models::State),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug already exists")
    ),
    security(("bearerAuth" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Json(request), _): WithRejection<Json<CreateStateRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StateRecord>>)> {
    let record = state.state_service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("State created", record)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/states/{id}",
    tag = "States",
    operation_id = "updateState",
    params(("id" = i64, Path, description = "State ID")),
    request_body = UpdateStateRequest,
    responses(
        (status = 200, description = "State updated", body = crate::models::State),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateStateRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<StateRecord>>> {
    let record = state.state_service.update(id, request).await?;
    Ok(Json(ApiResponse::success("State updated", record)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/states/{id}",
    tag = "States",
    operation_id = "deleteState",
    params(("id" = i64, Path, description = "State ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.state_service.delete(id).await?;
    Ok(Json(ApiResponse::message("State deleted")))
}

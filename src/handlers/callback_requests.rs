// Callback request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    app::AppState,
    middleware::AdminUser,
    models::{
        CallbackFilter, CallbackRequest, CreateCallbackRequest, Paginated, Pagination,
        StatusUpdateRequest,
    },
    utils::{ApiError, ApiResponse, ApiResult},
};

/// POST /api/v1/callback-requests/public
#[utoipa::path(
    post,
    path = "/api/v1/callback-requests/public",
    tag = "Callback Requests",
    operation_id = "requestCallback",
    request_body = CreateCallbackRequest,
    responses(
        (status = 201, description = "Callback requested", body = CallbackRequest),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_public(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateCallbackRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CallbackRequest>>)> {
    let callback = state.callback_service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Callback request submitted successfully",
            callback,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/callback-requests",
    tag = "Callback Requests",
    operation_id = "listCallbackRequests",
    params(CallbackFilter, Pagination),
    responses(
        (status = 200, description = "Page of callback requests, newest first"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearerAuth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Query(filter), _): WithRejection<Query<CallbackFilter>, ApiError>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, ApiError>,
) -> ApiResult<Json<ApiResponse<Paginated<CallbackRequest>>>> {
    let page = state.callback_service.list(&filter, pagination).await?;
    Ok(Json(ApiResponse::success("Callback requests retrieved", page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/callback-requests/{id}",
    tag = "Callback Requests",
    operation_id = "getCallbackRequest",
    params(("id" = i64, Path, description = "Callback request ID")),
    responses(
        (status = 200, description = "Callback request", body = CallbackRequest),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ApiResponse<CallbackRequest>>> {
    let callback = state.callback_service.get(id).await?;
    Ok(Json(ApiResponse::success("Callback request retrieved", callback)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/callback-requests/{id}/status",
    tag = "Callback Requests",
    operation_id = "updateCallbackStatus",
    params(("id" = i64, Path, description = "Callback request ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = CallbackRequest),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(request), _): WithRejection<Json<StatusUpdateRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<CallbackRequest>>> {
    let callback = state
        .callback_service
        .update_status(id, request, &admin)
        .await?;
    Ok(Json(ApiResponse::success("Status updated successfully", callback)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/callback-requests/{id}",
    tag = "Callback Requests",
    operation_id = "deleteCallbackRequest",
    params(("id" = i64, Path, description = "Callback request ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.callback_service.delete(id, &admin).await?;
    Ok(Json(ApiResponse::message("Callback request deleted")))
}

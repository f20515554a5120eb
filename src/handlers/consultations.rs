// Consultation lead endpoints

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
        Consultation, ConsultationFilter, CreateConsultationRequest, Paginated, Pagination,
        StatusUpdateRequest,
    },
    utils::{ApiError, ApiResponse, ApiResult},
};

/// POST /api/v1/consultations/public
#[utoipa::path(
    post,
    path = "/api/v1/consultations/public",
    tag = "Consultations",
    operation_id = "requestConsultation",
    request_body = CreateConsultationRequest,
    responses(
        (status = 201, description = "Consultation requested", body = Consultation),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_public(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateConsultationRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Consultation>>)> {
    let consultation = state.consultation_service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Consultation request submitted successfully",
            consultation,
        )),
    ))
}

/// GET /api/v1/consultations
#[utoipa::path(
    get,
    path = "/api/v1/consultations",
    tag = "Consultations",
    operation_id = "listConsultations",
    params(ConsultationFilter, Pagination),
    responses(
        (status = 200, description = "Page of consultations, newest first"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearerAuth" = []))
)]
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Query(filter), _): WithRejection<Query<ConsultationFilter>, ApiError>,
    WithRejection(Query(pagination), _): WithRejection<Query<Pagination>, ApiError>,
) -> ApiResult<Json<ApiResponse<Paginated<Consultation>>>> {
    let page = state.consultation_service.list(&filter, pagination).await?;
    Ok(Json(ApiResponse::success("Consultations retrieved", page)))
}

/// GET /api/v1/consultations/{id}
#[utoipa::path(
    get,
    path = "/api/v1/consultations/{id}",
    tag = "Consultations",
    operation_id = "getConsultation",
    params(("id" = i64, Path, description = "Consultation ID")),
    responses(
        (status = 200, description = "Consultation", body = Consultation),
        (status = 404, description = "Not found")
    ),
    security(("bearerAuth" = []))
)]
pub async fn get(
    State(state): State<AppState>,
    _admin: AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<ApiResponse<Consultation>>> {
    let consultation = state.consultation_service.get(id).await?;
    Ok(Json(ApiResponse::success("Consultation retrieved", consultation)))
}

/// PATCH|PUT /api/v1/consultations/{id}/status
#[utoipa::path(
    patch,
    path = "/api/v1/consultations/{id}/status",
    tag = "Consultations",
    operation_id = "updateConsultationStatus",
    params(("id" = i64, Path, description = "Consultation ID")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = Consultation),
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
) -> ApiResult<Json<ApiResponse<Consultation>>> {
    let consultation = state
        .consultation_service
        .update_status(id, request, &admin)
        .await?;
    Ok(Json(ApiResponse::success("Status updated successfully", consultation)))
}

/// DELETE /api/v1/consultations/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/consultations/{id}",
    tag = "Consultations",
    operation_id = "deleteConsultation",
    params(("id" = i64, Path, description = "Consultation ID")),
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
    state.consultation_service.delete(id, &admin).await?;
    Ok(Json(ApiResponse::message("Consultation deleted")))
}

// Outside production, 500 responses carry the underlying error instead of the generic message

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    app::AppState,
    utils::{ApiResponse, InternalErrorDetail},
};

pub async fn error_detail_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(InternalErrorDetail(detail)) = response.extensions_mut().remove::<InternalErrorDetail>()
    else {
        return response;
    };

    if state.config.is_production() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let body = Json(ApiResponse::failure(detail, None)).into_response();
    let (body_parts, body) = body.into_parts();
    if let Some(content_type) = body_parts.headers.get(header::CONTENT_TYPE) {
        parts.headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, body)
}

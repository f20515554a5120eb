// Bearer token resolution
// Runs on every route: a valid token adds AuthenticatedUser to request extensions,
// a rejected one adds AuthFailure. Routes decide via their extractors whether either matters.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    app::AppState,
    middleware::auth::{AuthFailure, AuthenticatedUser},
};

pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|h| h.to_str().unwrap_or_default().to_string());

    let Some(header) = auth_header else {
        return next.run(request).await;
    };

    let token = header.strip_prefix("Bearer ").map(str::trim);
    let user = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| "malformed authorization header".to_string())
        .and_then(|t| {
            app_state
                .jwt_service
                .validate_access_token(t)
                .map_err(|e| e.to_string())
        })
        .and_then(|claims| {
            AuthenticatedUser::from_claims(claims).ok_or_else(|| "bad subject".to_string())
        });

    match user {
        Ok(user) => {
            request.extensions_mut().insert(user);
        },
        Err(reason) => {
            tracing::warn!("JWT validation failed: {}", reason);
            request.extensions_mut().insert(AuthFailure);
        },
    }

    next.run(request).await
}

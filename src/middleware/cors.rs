use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderValue},
        Method, Request, Response, StatusCode,
    },
    middleware::Next,
};
use tracing::debug;

use crate::{app::AppState, app_config::AppConfig};

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type, authorization, accept, origin, x-requested-with";

/// Whether `origin` may make credentialed cross-origin requests
///
/// Exact matches against `CORS_ALLOWED_ORIGINS` always pass. In production an
/// https origin on `CORS_PRODUCTION_DOMAIN` or any of its subdomains passes too.
pub fn is_origin_allowed(config: &AppConfig, origin: &str) -> bool {
    let origin = origin.trim_end_matches('/');
    if config
        .security
        .cors_allowed_origins
        .iter()
        .any(|allowed| allowed == origin)
    {
        return true;
    }

    if !config.is_production() {
        return false;
    }

    let Some(domain) = config.security.cors_production_domain.as_deref() else {
        return false;
    };

    let Ok(url) = url::Url::parse(origin) else {
        return false;
    };
    if url.scheme() != "https" {
        return false;
    }

    url.host_str()
        .map(|host| host == domain || host.ends_with(&format!(".{}", domain)))
        .unwrap_or(false)
}

fn apply_cors_headers(response: &mut Response<Body>, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.append(header::VARY, HeaderValue::from_static("origin"));
    }
}

/// CORS middleware with an origin allow-list and credential support
pub async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let allowed_origin = origin.filter(|o| {
        let allowed = is_origin_allowed(&state.config, o);
        if !allowed {
            debug!("CORS: Origin not allowed: {}", o);
        }
        allowed
    });

    // Handle preflight OPTIONS requests
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;

        if let Some(allowed) = allowed_origin {
            apply_cors_headers(&mut response, &allowed);
            let headers = response.headers_mut();
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            );
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("3600"));
        }

        return response;
    }

    let mut response = next.run(req).await;
    if let Some(allowed) = allowed_origin {
        apply_cors_headers(&mut response, &allowed);
    }
    response
}

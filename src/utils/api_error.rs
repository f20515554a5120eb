// Central error classification for the HTTP layer
// Every handler returns Result<_, ApiError>; IntoResponse renders the envelope

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::utils::response::{ApiResponse, FieldError};

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("Too many requests, please try again later.")]
    RateLimited { retry_after: u64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Underlying cause of a 500, attached to the response for the detail middleware
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

pub const MISSING_TOKEN: &str = "Authentication required";
pub const INVALID_TOKEN: &str = "Invalid or expired token";

impl ApiError {
    /// Get HTTP status code for error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid_status() -> Self {
        ApiError::BadRequest("Invalid status".to_string())
    }
}

// =============================================================================
// ERROR CONVERSIONS
// =============================================================================

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => ApiError::Conflict("Record".to_string()),
            RepositoryError::Pool(msg) => ApiError::Database(format!("connection pool: {}", msg)),
            RepositoryError::Database(msg) => ApiError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(field_errors(&err))
    }
}

/// Flatten validator output into envelope field errors, ordered by field name
pub fn field_errors(err: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = err
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| FieldError {
                field: field.to_string(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field)),
                value: e.params.get("value").cloned(),
            })
        })
        .collect();

    // HashMap iteration order is unstable
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            ApiError::Validation(errors) => (
                status,
                Json(ApiResponse::failure("Validation failed", Some(errors))),
            )
                .into_response(),
            ApiError::RateLimited { retry_after } => {
                let mut response =
                    (status, Json(ApiResponse::failure(message, None))).into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            },
            ApiError::Database(detail) | ApiError::Internal(detail) => {
                tracing::error!("Request failed: {}", message);
                let mut response = (
                    status,
                    Json(ApiResponse::failure("Internal server error", None)),
                )
                    .into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                response
            },
            _ => (status, Json(ApiResponse::failure(message, None))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "too short"))]
        name: String,
        #[validate(required(message = "missing"))]
        email: Option<String>,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("Consultation").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::RateLimited { retry_after: 5 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::NotFound("Consultation").to_string(), "Consultation not found");
        assert_eq!(
            ApiError::Conflict("State".into()).to_string(),
            "State already exists"
        );
        assert_eq!(ApiError::invalid_status().to_string(), "Invalid status");
    }

    #[test]
    fn test_validation_errors_are_sorted_with_values() {
        let sample = Sample {
            name: "a".to_string(),
            email: None,
        };
        let err: ApiError = sample.validate().unwrap_err().into();
        match err {
            ApiError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "name"]);
                assert_eq!(errors[0].message, "missing");
                assert_eq!(errors[1].value, Some(serde_json::json!("a")));
            },
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_internal_error_hides_detail_and_attaches_extension() {
        let response = ApiError::Database("deadlock".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<InternalErrorDetail>().cloned();
        assert_eq!(detail.map(|d| d.0), Some("deadlock".to_string()));
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited { retry_after: 42 }.into_response();
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            &HeaderValue::from_static("42")
        );
    }
}

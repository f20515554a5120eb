// Authenticated principal and the extractors that gate protected routes

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::{
    app::AppState,
    models::{auth::AccessTokenClaims, user::Role},
    utils::{
        api_error::{INVALID_TOKEN, MISSING_TOKEN},
        ApiError,
    },
};

/// Authenticated user information extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub token_id: String,
    pub email: String,
    pub role: Role,
    pub exp: u64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: AccessTokenClaims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?,
            token_id: claims.jti,
            email: claims.email,
            role: claims.role,
            exp: claims.exp,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins see everything; others only records they own
    pub fn can_access(&self, owner_id: Option<i64>) -> bool {
        self.is_admin() || owner_id == Some(self.user_id)
    }
}

/// Marker left in request extensions when a bearer token was sent but rejected
#[derive(Debug, Clone, Copy)]
pub struct AuthFailure;

/// Extractor for AuthenticatedUser from request extensions
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        if parts.extensions.get::<AuthFailure>().is_some() {
            Err(ApiError::Unauthorized(INVALID_TOKEN))
        } else {
            Err(ApiError::Unauthorized(MISSING_TOKEN))
        }
    }
}

/// An authenticated user holding the `admin` role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!("User {} denied admin access", user.user_id);
            return Err(ApiError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

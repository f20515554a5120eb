// Account registration and login

use std::sync::Arc;
use tracing::{info, warn};

use crate::db::{RepositoryError, Store};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, User, UserProfile};
use crate::services::jwt::JwtService;
use crate::utils::{
    hash_password, verify_dummy_password, verify_password, ApiError, ApiResult, AuditAction,
    AuditLogger,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt_service: Arc<JwtService>) -> Self {
        Self { store, jwt_service }
    }

    fn issue(&self, user: User) -> ApiResult<AuthResponse> {
        let token = self
            .jwt_service
            .generate_access_token(&user)
            .map_err(|e| ApiError::Internal(format!("Failed to issue token: {}", e)))?;
        Ok(AuthResponse {
            user: UserProfile::from(user),
            token,
        })
    }

    /// Create a `user` account and return it with a fresh token
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<AuthResponse> {
        let registration = request.into_registration().map_err(ApiError::Validation)?;

        if self
            .store
            .find_user_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("User with this email".to_string()));
        }

        // Argon2 is CPU bound
        let password = registration.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let user = self
            .store
            .create_user(registration.into_new_user(password_hash))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    ApiError::Conflict("User with this email".to_string())
                },
                other => other.into(),
            })?;

        info!("New user registered: {}", user.email);
        AuditLogger::log(
            AuditAction::UserRegistered,
            "user",
            user.id,
            Some(&user.email),
            Some(user.id),
            None,
        );
        self.issue(user)
    }

    pub async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        let (email, password) = request.credentials().map_err(ApiError::Validation)?;

        let user = self.store.find_user_by_email(&email).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());

        // Argon2 runs for unknown emails too
        let valid = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => verify_password(&password, &hash).unwrap_or(false),
            None => verify_dummy_password(&password),
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?;

        let user = match user {
            Some(user) if valid => user,
            Some(user) => {
                warn!("Failed login for user {}", user.id);
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
            },
            None => {
                warn!("Login attempt for unknown email");
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
            },
        };

        info!("Login successful for user {}", user.id);
        self.issue(user)
    }

    /// Profile of the token's subject; a deleted account reads as an invalid token
    pub async fn me(&self, user_id: i64) -> ApiResult<UserProfile> {
        self.store
            .find_user_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(ApiError::Unauthorized(crate::utils::api_error::INVALID_TOKEN))
    }
}

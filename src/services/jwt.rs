// JWT access token service, HS256

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::auth::AccessTokenClaims;
use crate::models::user::User;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(String),

    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => JwtError::InvalidToken,
            _ => JwtError::EncodingError(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct JwtConfig {
    /// Token lifetime in seconds
    pub access_token_expiry: u64,
    pub algorithm: Algorithm,
    pub audience: String,
    pub issuer: String,
    pub encoding_key: EncodingKey,
    pub decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("algorithm", &self.algorithm)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("encoding_key", &"<redacted>")
            .field("decoding_key", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    fn build_from_params(secret: &str, expiry: u64, audience: String, issuer: String) -> Self {
        JwtConfig {
            access_token_expiry: expiry,
            algorithm: Algorithm::HS256,
            audience,
            issuer,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl From<&crate::app_config::JwtConfig> for JwtConfig {
    fn from(config: &crate::app_config::JwtConfig) -> Self {
        Self::build_from_params(
            &config.secret,
            config.expiry,
            config.audience.clone(),
            config.issuer.clone(),
        )
    }
}

pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn from_app_config(config: &crate::app_config::JwtConfig) -> Self {
        Self::new(JwtConfig::from(config))
    }

    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }

    /// Issue an access token for a user
    pub fn generate_access_token(&self, user: &User) -> Result<String, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| JwtError::KeyGenerationError(e.to_string()))?
            .as_secs();

        let claims = AccessTokenClaims {
            sub: user.id.to_string(),
            jti: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            role: user.role,
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.access_token_expiry,
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.config.encoding_key)
            .map_err(Into::into)
    }

    /// Validates an access token and returns the decoded claims
    ///
    /// # Errors
    /// * `JwtError::TokenExpired` - Token has expired (no leeway)
    /// * `JwtError::InvalidToken` - Bad signature, audience, issuer or format
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let mut validation = Validation::new(self.config.algorithm);
        validation.set_audience(&[self.config.audience.clone()]);
        validation.set_issuer(&[self.config.issuer.clone()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let token_data = decode::<AccessTokenClaims>(token, &self.config.decoding_key, &validation)?;
        if token_data.claims.user_id().is_none() {
            return Err(JwtError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

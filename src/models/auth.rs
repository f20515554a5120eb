// Access token claims

use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// Claims carried by every access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,

    /// JWT ID (UUID format)
    pub jti: String,

    pub email: String,

    pub role: Role,

    pub aud: String,

    pub iss: String,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: u64,

    /// Expires at timestamp (Unix epoch seconds)
    pub exp: u64,
}

impl AccessTokenClaims {
    /// Numeric user id from `sub`
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

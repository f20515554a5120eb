// User accounts: applicants who file RTI applications and the admins who process them

use chrono::{NaiveDateTime, Utc};
use diesel::{deserialize::FromSqlRow, expression::AsExpression, prelude::*, sql_types::Text};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::schema::users;
use crate::utils::api_error::field_errors;
use crate::utils::response::FieldError;
use crate::utils::validation::{normalize_email, normalize_phone, trim_optional_field};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

text_column_enum!(Role);

/// User database model - queryable from database
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
#[non_exhaustive]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: Role,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            mobile: user.mobile,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// =============================================================================
// REQUEST MODELS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(required(message = "Full name is required"))]
    #[validate(length(min = 2, max = 100, message = "Full name must be 2-100 characters"))]
    pub full_name: Option<String>,

    #[validate(required(message = "Email is required"))]
    #[validate(regex(
        path = "crate::utils::validation::EMAIL_REGEX",
        message = "Please provide a valid email address"
    ))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,

    #[validate(required(message = "Password is required"))]
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(regex(
        path = "crate::utils::validation::MOBILE_REGEX",
        message = "Please provide a valid 10-digit Indian mobile number"
    ))]
    pub mobile: Option<String>,
}

/// Validated registration; the password is still plaintext until the service hashes it
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub mobile: Option<String>,
}

impl RegisterRequest {
    pub fn into_registration(self) -> Result<Registration, Vec<FieldError>> {
        let request = Self {
            full_name: trim_optional_field(self.full_name),
            email: normalize_email(self.email),
            // Passwords are taken verbatim; only an empty string counts as missing
            password: self.password.filter(|p| !p.is_empty()),
            mobile: normalize_phone(self.mobile),
        };
        request.validate().map_err(|e| {
            let mut errors = field_errors(&e);
            for error in errors.iter_mut().filter(|e| e.field == "password") {
                error.value = None;
            }
            errors
        })?;

        Ok(Registration {
            full_name: request.full_name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            mobile: request.mobile,
        })
    }
}

impl Registration {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        let now = Utc::now().naive_utc();
        NewUser {
            full_name: self.full_name,
            email: self.email,
            mobile: self.mobile,
            password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Lower-cased email and raw password, or field errors for whichever is missing
    pub fn credentials(self) -> Result<(String, String), Vec<FieldError>> {
        let email = normalize_email(self.email);
        let password = self.password.filter(|p| !p.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            (email, password) => {
                let mut errors = Vec::new();
                if email.is_none() {
                    errors.push(FieldError::new("email", "Email is required"));
                }
                if password.is_none() {
                    errors.push(FieldError::new("password", "Password is required"));
                }
                Err(errors)
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::User.to_string(), "user");
    }

    #[test]
    fn test_registration_hides_password_value() {
        let errors = RegisterRequest {
            full_name: Some("Meera".to_string()),
            email: Some("meera@example.com".to_string()),
            password: Some("short".to_string()),
            mobile: None,
        }
        .into_registration()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
        assert!(errors[0].value.is_none());
    }

    #[test]
    fn test_registration_normalizes_email() {
        let registration = RegisterRequest {
            full_name: Some(" Meera ".to_string()),
            email: Some("Meera@Example.com".to_string()),
            password: Some("correct horse battery".to_string()),
            mobile: Some("98765-43210".to_string()),
        }
        .into_registration()
        .unwrap();

        assert_eq!(registration.email, "meera@example.com");
        assert_eq!(registration.mobile.as_deref(), Some("9876543210"));
        assert_eq!(registration.into_new_user("hash".into()).role, Role::User);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginRequest::default().credentials().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}

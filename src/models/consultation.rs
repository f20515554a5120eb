// Consultation leads captured from the public site

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::status::LeadStatus;
use crate::schema::consultations;
use crate::utils::api_error::field_errors;
use crate::utils::response::FieldError;
use crate::utils::validation::{normalize_email, normalize_phone, trim_optional_field};

pub const DEFAULT_SOURCE: &str = "hero_section";

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = consultations)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct Consultation {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub state_slug: Option<String>,
    pub source: String,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = consultations)]
#[non_exhaustive]
pub struct NewConsultation {
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub state_slug: Option<String>,
    pub source: String,
    pub status: LeadStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateConsultationRequest {
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

    #[validate(required(message = "Mobile number is required"))]
    #[validate(regex(
        path = "crate::utils::validation::MOBILE_REGEX",
        message = "Please provide a valid 10-digit Indian mobile number"
    ))]
    pub mobile: Option<String>,

    #[validate(length(max = 500, message = "Address must be less than 500 characters"))]
    pub address: Option<String>,

    #[validate(regex(
        path = "crate::utils::validation::PINCODE_REGEX",
        message = "Please provide a valid 6-digit pincode"
    ))]
    pub pincode: Option<String>,

    #[validate(length(max = 100, message = "State must be less than 100 characters"))]
    #[validate(regex(
        path = "crate::utils::validation::STATE_SLUG_REGEX",
        message = "State must contain only lowercase letters, numbers and hyphens"
    ))]
    pub state_slug: Option<String>,

    #[validate(length(max = 50, message = "Source must be less than 50 characters"))]
    pub source: Option<String>,
}

impl CreateConsultationRequest {
    pub fn into_new_consultation(self) -> Result<NewConsultation, Vec<FieldError>> {
        let request = Self {
            full_name: trim_optional_field(self.full_name),
            email: normalize_email(self.email),
            mobile: normalize_phone(self.mobile),
            address: trim_optional_field(self.address),
            pincode: trim_optional_field(self.pincode),
            state_slug: trim_optional_field(self.state_slug),
            source: trim_optional_field(self.source),
        };
        request.validate().map_err(|e| field_errors(&e))?;

        let now = Utc::now().naive_utc();
        Ok(NewConsultation {
            full_name: request.full_name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            mobile: request.mobile.unwrap_or_default(),
            address: request.address,
            pincode: request.pincode,
            state_slug: request.state_slug,
            source: request.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            status: LeadStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConsultationFilter {
    pub status: Option<LeadStatus>,
    pub state_slug: Option<String>,
    pub source: Option<String>,
}

impl ConsultationFilter {
    pub fn matches(&self, consultation: &Consultation) -> bool {
        self.status.map_or(true, |s| consultation.status == s)
            && self
                .state_slug
                .as_ref()
                .map_or(true, |slug| consultation.state_slug.as_ref() == Some(slug))
            && self
                .source
                .as_ref()
                .map_or(true, |source| &consultation.source == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_source_defaults_to_hero_section() {
        let request: CreateConsultationRequest = serde_json::from_value(json!({
            "full_name": "Ravi Kumar",
            "email": "ravi@example.com",
            "mobile": "9123456789",
            "source": "  "
        }))
        .unwrap();

        let new = request.into_new_consultation().unwrap();
        assert_eq!(new.source, DEFAULT_SOURCE);
        assert_eq!(new.status, LeadStatus::Pending);
    }

    #[test]
    fn test_state_slug_format() {
        let request: CreateConsultationRequest = serde_json::from_value(json!({
            "full_name": "Ravi Kumar",
            "email": "ravi@example.com",
            "mobile": "9123456789",
            "state_slug": "Tamil Nadu"
        }))
        .unwrap();

        let errors = request.into_new_consultation().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "state_slug");
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = CreateConsultationRequest::default()
            .into_new_consultation()
            .unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "full_name", "mobile"]);
    }
}

// Callback requests: a phone number and optionally the state of interest

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::status::LeadStatus;
use crate::schema::callback_requests;
use crate::utils::api_error::field_errors;
use crate::utils::response::FieldError;
use crate::utils::validation::{normalize_phone, trim_optional_field};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = callback_requests)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct CallbackRequest {
    pub id: i64,
    pub phone: String,
    pub state_slug: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = callback_requests)]
#[non_exhaustive]
pub struct NewCallbackRequest {
    pub phone: String,
    pub state_slug: Option<String>,
    pub status: LeadStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateCallbackRequest {
    #[validate(required(message = "Phone number is required"))]
    #[validate(regex(
        path = "crate::utils::validation::MOBILE_REGEX",
        message = "Please provide a valid 10-digit Indian mobile number"
    ))]
    pub phone: Option<String>,

    #[validate(length(max = 100, message = "State must be less than 100 characters"))]
    #[validate(regex(
        path = "crate::utils::validation::STATE_SLUG_REGEX",
        message = "State must contain only lowercase letters, numbers and hyphens"
    ))]
    pub state_slug: Option<String>,
}

impl CreateCallbackRequest {
    pub fn into_new_callback(self) -> Result<NewCallbackRequest, Vec<FieldError>> {
        let request = Self {
            phone: normalize_phone(self.phone),
            state_slug: trim_optional_field(self.state_slug),
        };
        request.validate().map_err(|e| field_errors(&e))?;

        let now = Utc::now().naive_utc();
        Ok(NewCallbackRequest {
            phone: request.phone.unwrap_or_default(),
            state_slug: request.state_slug,
            status: LeadStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackFilter {
    pub status: Option<LeadStatus>,
    pub state_slug: Option<String>,
}

impl CallbackFilter {
    pub fn matches(&self, callback: &CallbackRequest) -> bool {
        self.status.map_or(true, |s| callback.status == s)
            && self
                .state_slug
                .as_ref()
                .map_or(true, |slug| callback.state_slug.as_ref() == Some(slug))
    }
}

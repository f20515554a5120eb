// RTI application model, submission DTOs and filters

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::status::ApplicationStatus;
use crate::schema::rti_applications;
use crate::utils::api_error::field_errors;
use crate::utils::response::FieldError;
use crate::utils::validation::{
    normalize_email, normalize_id, normalize_phone, parse_id, trim_optional_field,
    validate_positive_id,
};

// =============================================================================
// DATABASE MODELS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = rti_applications)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct RtiApplication {
    pub id: i64,
    pub user_id: Option<i64>,
    pub service_id: i64,
    pub state_id: i64,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub rti_query: Option<String>,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated application ready for insertion; only built from a request
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rti_applications)]
#[non_exhaustive]
pub struct NewRtiApplication {
    pub user_id: Option<i64>,
    pub service_id: i64,
    pub state_id: i64,
    pub full_name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub rti_query: Option<String>,
    pub status: ApplicationStatus,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Validated applicant-detail edit; status is never part of it
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = rti_applications)]
#[non_exhaustive]
pub struct RtiApplicationChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub rti_query: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

// =============================================================================
// REQUEST MODELS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateRtiApplicationRequest {
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

    #[validate(required(message = "Service is required"))]
    #[validate(custom(function = "validate_positive_id", message = "Service ID must be a positive integer"))]
    #[schema(value_type = Option<i64>)]
    pub service_id: Option<serde_json::Value>,

    #[validate(required(message = "State is required"))]
    #[validate(custom(function = "validate_positive_id", message = "State ID must be a positive integer"))]
    #[schema(value_type = Option<i64>)]
    pub state_id: Option<serde_json::Value>,

    #[validate(length(max = 500, message = "Address must be less than 500 characters"))]
    pub address: Option<String>,

    #[validate(regex(
        path = "crate::utils::validation::PINCODE_REGEX",
        message = "Please provide a valid 6-digit pincode"
    ))]
    pub pincode: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "RTI query must be 10-5000 characters"))]
    pub rti_query: Option<String>,

    #[validate(length(max = 100, message = "Payment ID must be less than 100 characters"))]
    pub payment_id: Option<String>,

    #[validate(length(max = 100, message = "Order ID must be less than 100 characters"))]
    pub order_id: Option<String>,
}

impl CreateRtiApplicationRequest {
    /// Trim strings, drop blanks, keep only digits in phone numbers and lower-case email
    pub fn normalize(self) -> Self {
        Self {
            full_name: trim_optional_field(self.full_name),
            email: normalize_email(self.email),
            mobile: normalize_phone(self.mobile),
            service_id: normalize_id(self.service_id),
            state_id: normalize_id(self.state_id),
            address: trim_optional_field(self.address),
            pincode: trim_optional_field(self.pincode),
            rti_query: trim_optional_field(self.rti_query),
            payment_id: trim_optional_field(self.payment_id),
            order_id: trim_optional_field(self.order_id),
        }
    }

    /// Normalize and validate; `user_id` is the owning principal for authenticated submissions
    pub fn into_new_application(
        self,
        user_id: Option<i64>,
    ) -> Result<NewRtiApplication, Vec<FieldError>> {
        let request = self.normalize();
        request.validate().map_err(|e| field_errors(&e))?;

        let missing = |field: &str| vec![FieldError::new(field, format!("{} is required", field))];
        let service_id = request
            .service_id
            .as_ref()
            .and_then(parse_id)
            .ok_or_else(|| missing("service_id"))?;
        let state_id = request
            .state_id
            .as_ref()
            .and_then(parse_id)
            .ok_or_else(|| missing("state_id"))?;

        let now = Utc::now().naive_utc();
        Ok(NewRtiApplication {
            user_id,
            service_id,
            state_id,
            full_name: request.full_name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            mobile: request.mobile.unwrap_or_default(),
            address: request.address,
            pincode: request.pincode,
            rti_query: request.rti_query,
            status: ApplicationStatus::Pending,
            payment_id: request.payment_id,
            order_id: request.order_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Owner edit of applicant details; every field optional
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateRtiApplicationRequest {
    #[validate(length(min = 2, max = 100, message = "Full name must be 2-100 characters"))]
    pub full_name: Option<String>,

    #[validate(regex(
        path = "crate::utils::validation::EMAIL_REGEX",
        message = "Please provide a valid email address"
    ))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: Option<String>,

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

    #[validate(length(min = 10, max = 5000, message = "RTI query must be 10-5000 characters"))]
    pub rti_query: Option<String>,
}

impl UpdateRtiApplicationRequest {
    pub fn into_changes(self) -> Result<RtiApplicationChanges, Vec<FieldError>> {
        let request = Self {
            full_name: trim_optional_field(self.full_name),
            email: normalize_email(self.email),
            mobile: normalize_phone(self.mobile),
            address: trim_optional_field(self.address),
            pincode: trim_optional_field(self.pincode),
            rti_query: trim_optional_field(self.rti_query),
        };
        request.validate().map_err(|e| field_errors(&e))?;

        let changes = RtiApplicationChanges {
            full_name: request.full_name,
            email: request.email,
            mobile: request.mobile,
            address: request.address,
            pincode: request.pincode,
            rti_query: request.rti_query,
            updated_at: None,
        };
        if changes.is_empty() {
            return Err(vec![FieldError::new("body", "No fields to update")]);
        }

        Ok(RtiApplicationChanges {
            updated_at: Some(Utc::now().naive_utc()),
            ..changes
        })
    }
}

impl RtiApplicationChanges {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.address.is_none()
            && self.pincode.is_none()
            && self.rti_query.is_none()
    }

    /// Apply onto an in-memory record
    pub fn apply_to(&self, application: &mut RtiApplication) {
        if let Some(v) = &self.full_name {
            application.full_name = v.clone();
        }
        if let Some(v) = &self.email {
            application.email = v.clone();
        }
        if let Some(v) = &self.mobile {
            application.mobile = v.clone();
        }
        if self.address.is_some() {
            application.address = self.address.clone();
        }
        if self.pincode.is_some() {
            application.pincode = self.pincode.clone();
        }
        if self.rti_query.is_some() {
            application.rti_query = self.rti_query.clone();
        }
        if let Some(at) = self.updated_at {
            application.updated_at = at;
        }
    }
}

/// Admin status change, shared by every resource; `status` is parsed per resource
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,

    #[validate(length(max = 1000, message = "Notes must be less than 1000 characters"))]
    pub notes: Option<String>,
}

impl StatusUpdateRequest {
    /// Parse the status into `S`; missing or unknown values are None
    pub fn parse_status<S: std::str::FromStr>(&self) -> Option<S> {
        self.status.as_deref().map(str::trim).and_then(|s| s.parse().ok())
    }

    pub fn notes(&self) -> Option<String> {
        trim_optional_field(self.notes.clone())
    }
}

// =============================================================================
// QUERY MODELS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub state_id: Option<i64>,
    pub service_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &RtiApplication) -> bool {
        self.status.map_or(true, |s| application.status == s)
            && self.state_id.map_or(true, |id| application.state_id == id)
            && self.service_id.map_or(true, |id| application.service_id == id)
            && self.user_id.map_or(true, |id| application.user_id == Some(id))
    }
}

/// Filter for the caller's own applications
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnApplicationFilter {
    pub status: Option<ApplicationStatus>,
}

// =============================================================================
// RESPONSE MODELS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApplicationStats {
    pub total: i64,
    /// Every status is present, zero when no application has it
    pub by_status: BTreeMap<String, i64>,
}

impl ApplicationStats {
    pub fn from_counts(counts: Vec<(ApplicationStatus, i64)>) -> Self {
        let mut by_status: BTreeMap<String, i64> = ApplicationStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in counts {
            *by_status.entry(status.as_str().to_string()).or_insert(0) += count;
        }

        Self {
            total: by_status.values().sum(),
            by_status,
        }
    }
}

// Indian states reference data, admin-managed

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::schema::states;
use crate::utils::api_error::field_errors;
use crate::utils::response::FieldError;
use crate::utils::validation::trim_optional_field;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = states)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub struct State {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub departments: Option<Value>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub faqs: Option<Value>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub process_steps: Option<Value>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = states)]
#[non_exhaustive]
pub struct NewState {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub departments: Option<Value>,
    pub faqs: Option<Value>,
    pub process_steps: Option<Value>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = states)]
#[non_exhaustive]
pub struct StateChanges {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub departments: Option<Value>,
    pub faqs: Option<Value>,
    pub process_steps: Option<Value>,
    pub is_active: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

fn validate_json_array(value: &Value) -> Result<(), ValidationError> {
    if value.is_array() {
        Ok(())
    } else {
        Err(ValidationError::new("array"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateStateRequest {
    #[validate(required(message = "Slug is required"))]
    #[validate(length(max = 100, message = "Slug must be less than 100 characters"))]
    #[validate(regex(
        path = "crate::utils::validation::STATE_SLUG_REGEX",
        message = "Slug must contain only lowercase letters, numbers and hyphens"
    ))]
    pub slug: Option<String>,

    #[validate(required(message = "Name is required"))]
    #[validate(length(min = 2, max = 150, message = "Name must be 2-150 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_json_array", message = "Departments must be an array"))]
    #[schema(value_type = Option<Vec<Object>>)]
    pub departments: Option<Value>,

    #[validate(custom(function = "validate_json_array", message = "FAQs must be an array"))]
    #[schema(value_type = Option<Vec<Object>>)]
    pub faqs: Option<Value>,

    #[validate(custom(function = "validate_json_array", message = "Process steps must be an array"))]
    #[schema(value_type = Option<Vec<Object>>)]
    pub process_steps: Option<Value>,

    pub is_active: Option<bool>,
}

/// JSON null is treated as absent
fn non_null(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

impl CreateStateRequest {
    pub fn into_new_state(self) -> Result<NewState, Vec<FieldError>> {
        let request = Self {
            slug: trim_optional_field(self.slug).map(|s| s.to_lowercase()),
            name: trim_optional_field(self.name),
            description: trim_optional_field(self.description),
            departments: non_null(self.departments),
            faqs: non_null(self.faqs),
            process_steps: non_null(self.process_steps),
            is_active: self.is_active,
        };
        request.validate().map_err(|e| field_errors(&e))?;

        let now = Utc::now().naive_utc();
        Ok(NewState {
            slug: request.slug.unwrap_or_default(),
            name: request.name.unwrap_or_default(),
            description: request.description,
            departments: request.departments,
            faqs: request.faqs,
            process_steps: request.process_steps,
            is_active: request.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateStateRequest {
    #[validate(length(max = 100, message = "Slug must be less than 100 characters"))]
    #[validate(regex(
        path = "crate::utils::validation::STATE_SLUG_REGEX",
        message = "Slug must contain only lowercase letters, numbers and hyphens"
    ))]
    pub slug: Option<String>,

    #[validate(length(min = 2, max = 150, message = "Name must be 2-150 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_json_array", message = "Departments must be an array"))]
    #[schema(value_type = Option<Vec<Object>>)]
    pub departments: Option<Value>,

    #[validate(custom(function = "validate_json_array", message = "FAQs must be an array"))]
    #[schema(value_type = Option<Vec<Object>>)]
    pub faqs: Option<Value>,

    #[validate(custom(function = "validate_json_array", message = "Process steps must be an array"))]
    #[schema(value_type = Option<Vec<Object>>)]
    pub process_steps: Option<Value>,

    pub is_active: Option<bool>,
}

impl UpdateStateRequest {
    pub fn into_changes(self) -> Result<StateChanges, Vec<FieldError>> {
        let request = Self {
            slug: trim_optional_field(self.slug).map(|s| s.to_lowercase()),
            name: trim_optional_field(self.name),
            description: trim_optional_field(self.description),
            departments: non_null(self.departments),
            faqs: non_null(self.faqs),
            process_steps: non_null(self.process_steps),
            is_active: self.is_active,
        };
        request.validate().map_err(|e| field_errors(&e))?;

        let changes = StateChanges {
            slug: request.slug,
            name: request.name,
            description: request.description,
            departments: request.departments,
            faqs: request.faqs,
            process_steps: request.process_steps,
            is_active: request.is_active,
            updated_at: Some(Utc::now().naive_utc()),
        };
        if changes.is_empty() {
            return Err(vec![FieldError::new("body", "No fields to update")]);
        }
        Ok(changes)
    }
}

impl StateChanges {
    pub fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.departments.is_none()
            && self.faqs.is_none()
            && self.process_steps.is_none()
            && self.is_active.is_none()
    }

    /// Apply onto an in-memory record
    pub fn apply_to(&self, state: &mut State) {
        if let Some(v) = &self.slug {
            state.slug = v.clone();
        }
        if let Some(v) = &self.name {
            state.name = v.clone();
        }
        if self.description.is_some() {
            state.description = self.description.clone();
        }
        if self.departments.is_some() {
            state.departments = self.departments.clone();
        }
        if self.faqs.is_some() {
            state.faqs = self.faqs.clone();
        }
        if self.process_steps.is_some() {
            state.process_steps = self.process_steps.clone();
        }
        if let Some(active) = self.is_active {
            state.is_active = active;
        }
        if let Some(at) = self.updated_at {
            state.updated_at = at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_state_defaults_active() {
        let request: CreateStateRequest = serde_json::from_value(json!({
            "slug": " Kerala ",
            "name": "Kerala",
            "departments": [{"name": "Revenue"}],
            "faqs": null
        }))
        .unwrap();

        let new = request.into_new_state().unwrap();
        assert_eq!(new.slug, "kerala");
        assert!(new.is_active);
        assert!(new.faqs.is_none());
    }

    #[test]
    fn test_departments_must_be_array() {
        let request: CreateStateRequest = serde_json::from_value(json!({
            "slug": "goa",
            "name": "Goa",
            "departments": {"name": "Revenue"}
        }))
        .unwrap();

        let errors = request.into_new_state().unwrap_err();
        assert_eq!(errors[0].field, "departments");
    }

    #[test]
    fn test_empty_update_rejected() {
        let errors = UpdateStateRequest::default().into_changes().unwrap_err();
        assert_eq!(errors[0].field, "body");
    }
}

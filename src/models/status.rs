// Closed status sets stored as VARCHAR columns

use diesel::{deserialize::FromSqlRow, expression::AsExpression, sql_types::Text};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Processing status of an RTI application
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Submitted,
    InProgress,
    Completed,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Submitted,
        ApplicationStatus::InProgress,
        ApplicationStatus::Completed,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::InProgress => "in_progress",
            ApplicationStatus::Completed => "completed",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid application status: {}", s))
    }
}

/// Follow-up status shared by consultations and callback requests
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Pending,
    Contacted,
    Scheduled,
    Completed,
    Cancelled,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::Pending,
        LeadStatus::Contacted,
        LeadStatus::Scheduled,
        LeadStatus::Completed,
        LeadStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Pending => "pending",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Scheduled => "scheduled",
            LeadStatus::Completed => "completed",
            LeadStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid lead status: {}", s))
    }
}

text_column_enum!(ApplicationStatus);
text_column_enum!(LeadStatus);

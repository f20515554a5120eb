// Audit logging for submission lifecycle events
// Emitted as one JSON line per event on the `audit` tracing target

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    RecordCreated,
    RecordUpdated,
    StatusUpdated,
    RecordDeleted,
    UserRegistered,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: i64,
    /// Email or phone that identifies the submitter
    pub identifier: Option<String>,
    /// Principal that triggered the event, None for public submissions
    pub actor_id: Option<i64>,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct AuditLogger;

impl AuditLogger {
    pub fn log(
        action: AuditAction,
        resource_type: &str,
        resource_id: i64,
        identifier: Option<&str>,
        actor_id: Option<i64>,
        details: Option<String>,
    ) {
        let audit_log = AuditLog {
            id: Uuid::new_v4(),
            action,
            resource_type: resource_type.to_string(),
            resource_id,
            identifier: identifier.map(str::to_string),
            actor_id,
            details,
            timestamp: Utc::now(),
        };

        let json_log = serde_json::to_string(&audit_log).unwrap_or_else(|e| {
            warn!("Failed to serialize audit log: {}", e);
            format!("{:?}", audit_log)
        });

        info!(target: "audit", "{}", json_log);
    }
}

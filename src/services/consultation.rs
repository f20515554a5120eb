// Consultation lead workflow

use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::db::Store;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    Consultation, ConsultationFilter, CreateConsultationRequest, LeadStatus, Paginated,
    Pagination, StatusUpdateRequest,
};
use crate::utils::{ApiError, ApiResult, AuditAction, AuditLogger};

const RESOURCE: &str = "Consultation";

pub struct ConsultationService {
    store: Arc<dyn Store>,
}

impl ConsultationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Identical submissions are stored as distinct records
    pub async fn create(&self, request: CreateConsultationRequest) -> ApiResult<Consultation> {
        let new = request
            .into_new_consultation()
            .map_err(ApiError::Validation)?;
        let consultation = self.store.create_consultation(new).await?;

        info!(
            "Consultation {} requested from {}",
            consultation.id, consultation.source
        );
        AuditLogger::log(
            AuditAction::RecordCreated,
            "consultation",
            consultation.id,
            Some(&consultation.email),
            None,
            None,
        );
        Ok(consultation)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Consultation> {
        self.store
            .find_consultation(id)
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))
    }

    pub async fn list(
        &self,
        filter: &ConsultationFilter,
        pagination: Pagination,
    ) -> ApiResult<Paginated<Consultation>> {
        let (items, total) = self.store.list_consultations(filter, pagination).await?;
        Ok(Paginated::new(items, total, pagination))
    }

    pub async fn update_status(
        &self,
        id: i64,
        request: StatusUpdateRequest,
        admin: &AuthenticatedUser,
    ) -> ApiResult<Consultation> {
        let status: LeadStatus = request.parse_status().ok_or_else(ApiError::invalid_status)?;
        request.validate()?;

        let previous = self.get(id).await?;
        let consultation = self
            .store
            .update_consultation_status(id, status, request.notes())
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))?;

        AuditLogger::log(
            AuditAction::StatusUpdated,
            "consultation",
            id,
            Some(&consultation.email),
            Some(admin.user_id),
            Some(format!("{} -> {}", previous.status, consultation.status)),
        );
        Ok(consultation)
    }

    pub async fn delete(&self, id: i64, admin: &AuthenticatedUser) -> ApiResult<()> {
        let existing = self.get(id).await?;
        if !self.store.delete_consultation(id).await? {
            return Err(ApiError::NotFound(RESOURCE));
        }

        AuditLogger::log(
            AuditAction::RecordDeleted,
            "consultation",
            id,
            Some(&existing.email),
            Some(admin.user_id),
            None,
        );
        Ok(())
    }
}

// Callback request workflow

use std::sync::Arc;
use validator::Validate;

use crate::db::Store;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    CallbackFilter, CallbackRequest, CreateCallbackRequest, LeadStatus, Paginated, Pagination,
    StatusUpdateRequest,
};
use crate::utils::{ApiError, ApiResult, AuditAction, AuditLogger};

const RESOURCE: &str = "Callback request";

pub struct CallbackService {
    store: Arc<dyn Store>,
}

impl CallbackService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateCallbackRequest) -> ApiResult<CallbackRequest> {
        let new = request.into_new_callback().map_err(ApiError::Validation)?;
        let callback = self.store.create_callback(new).await?;

        AuditLogger::log(
            AuditAction::RecordCreated,
            "callback_request",
            callback.id,
            Some(&callback.phone),
            None,
            None,
        );
        Ok(callback)
    }

    pub async fn get(&self, id: i64) -> ApiResult<CallbackRequest> {
        self.store
            .find_callback(id)
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))
    }

    pub async fn list(
        &self,
        filter: &CallbackFilter,
        pagination: Pagination,
    ) -> ApiResult<Paginated<CallbackRequest>> {
        let (items, total) = self.store.list_callbacks(filter, pagination).await?;
        Ok(Paginated::new(items, total, pagination))
    }

    pub async fn update_status(
        &self,
        id: i64,
        request: StatusUpdateRequest,
        admin: &AuthenticatedUser,
    ) -> ApiResult<CallbackRequest> {
        let status: LeadStatus = request.parse_status().ok_or_else(ApiError::invalid_status)?;
        request.validate()?;

        let previous = self.get(id).await?;
        let callback = self
            .store
            .update_callback_status(id, status, request.notes())
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))?;

        AuditLogger::log(
            AuditAction::StatusUpdated,
            "callback_request",
            id,
            Some(&callback.phone),
            Some(admin.user_id),
            Some(format!("{} -> {}", previous.status, callback.status)),
        );
        Ok(callback)
    }

    pub async fn delete(&self, id: i64, admin: &AuthenticatedUser) -> ApiResult<()> {
        let existing = self.get(id).await?;
        if !self.store.delete_callback(id).await? {
            return Err(ApiError::NotFound(RESOURCE));
        }

        AuditLogger::log(
            AuditAction::RecordDeleted,
            "callback_request",
            id,
            Some(&existing.phone),
            Some(admin.user_id),
            None,
        );
        Ok(())
    }
}

// RTI application workflow: submit, read, list, edit, status changes, delete

use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::db::Store;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    ApplicationFilter, ApplicationStats, ApplicationStatus, CreateRtiApplicationRequest,
    OwnApplicationFilter, Paginated, Pagination, RtiApplication, StatusUpdateRequest,
    UpdateRtiApplicationRequest,
};
use crate::utils::{ApiError, ApiResult, AuditAction, AuditLogger};

const RESOURCE: &str = "RTI application";

pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Validate and persist a submission; `owner` is set for authenticated submissions
    pub async fn submit(
        &self,
        request: CreateRtiApplicationRequest,
        owner: Option<&AuthenticatedUser>,
    ) -> ApiResult<RtiApplication> {
        let new = request
            .into_new_application(owner.map(|u| u.user_id))
            .map_err(ApiError::Validation)?;

        let application = self.store.create_application(new).await?;

        info!("RTI application {} submitted", application.id);
        AuditLogger::log(
            AuditAction::RecordCreated,
            "rti_application",
            application.id,
            Some(&application.email),
            application.user_id,
            None,
        );
        Ok(application)
    }

    async fn find(&self, id: i64) -> ApiResult<RtiApplication> {
        self.store
            .find_application(id)
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))
    }

    /// Fetch an application the caller is allowed to see
    pub async fn get(&self, id: i64, user: &AuthenticatedUser) -> ApiResult<RtiApplication> {
        let application = self.find(id).await?;
        if !user.can_access(application.user_id) {
            return Err(ApiError::Forbidden);
        }
        Ok(application)
    }

    pub async fn list(
        &self,
        filter: &ApplicationFilter,
        pagination: Pagination,
    ) -> ApiResult<Paginated<RtiApplication>> {
        let (items, total) = self.store.list_applications(filter, pagination).await?;
        Ok(Paginated::new(items, total, pagination))
    }

    pub async fn list_mine(
        &self,
        user: &AuthenticatedUser,
        filter: OwnApplicationFilter,
        pagination: Pagination,
    ) -> ApiResult<Paginated<RtiApplication>> {
        let filter = ApplicationFilter {
            status: filter.status,
            user_id: Some(user.user_id),
            ..Default::default()
        };
        self.list(&filter, pagination).await
    }

    /// Edit applicant details; owner or admin
    pub async fn update_details(
        &self,
        id: i64,
        request: UpdateRtiApplicationRequest,
        user: &AuthenticatedUser,
    ) -> ApiResult<RtiApplication> {
        let existing = self.find(id).await?;
        if !user.can_access(existing.user_id) {
            return Err(ApiError::Forbidden);
        }

        let changes = request.into_changes().map_err(ApiError::Validation)?;
        let application = self
            .store
            .update_application(id, changes)
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))?;

        AuditLogger::log(
            AuditAction::RecordUpdated,
            "rti_application",
            id,
            Some(&application.email),
            Some(user.user_id),
            None,
        );
        Ok(application)
    }

    pub async fn update_status(
        &self,
        id: i64,
        request: StatusUpdateRequest,
        admin: &AuthenticatedUser,
    ) -> ApiResult<RtiApplication> {
        let status: ApplicationStatus = request.parse_status().ok_or_else(ApiError::invalid_status)?;
        request.validate()?;

        let previous = self.find(id).await?;
        let application = self
            .store
            .update_application_status(id, status, request.notes())
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))?;

        AuditLogger::log(
            AuditAction::StatusUpdated,
            "rti_application",
            id,
            Some(&application.email),
            Some(admin.user_id),
            Some(format!("{} -> {}", previous.status, application.status)),
        );
        Ok(application)
    }

    /// Hard delete; owner or admin
    pub async fn delete(&self, id: i64, user: &AuthenticatedUser) -> ApiResult<()> {
        let existing = self.find(id).await?;
        if !user.can_access(existing.user_id) {
            return Err(ApiError::Forbidden);
        }

        if !self.store.delete_application(id).await? {
            return Err(ApiError::NotFound(RESOURCE));
        }

        AuditLogger::log(
            AuditAction::RecordDeleted,
            "rti_application",
            id,
            Some(&existing.email),
            Some(user.user_id),
            None,
        );
        Ok(())
    }

    pub async fn stats(&self) -> ApiResult<ApplicationStats> {
        let counts = self.store.count_applications_by_status().await?;
        Ok(ApplicationStats::from_counts(counts))
    }
}

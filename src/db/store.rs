// Repository traits: the seam between services and storage

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    ApplicationFilter, ApplicationStatus, CallbackFilter, CallbackRequest, Consultation,
    ConsultationFilter, LeadStatus, NewCallbackRequest, NewConsultation, NewRtiApplication,
    NewState, NewUser, Pagination, RtiApplication, RtiApplicationChanges, State, StateChanges,
    User,
};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::Conflict(info.message().to_string())
            },
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

impl<E> From<bb8::RunError<E>> for RepositoryError
where
    E: std::error::Error + 'static,
{
    fn from(err: bb8::RunError<E>) -> Self {
        RepositoryError::Pool(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// One page of rows plus the unpaginated total
pub type Page<T> = (Vec<T>, i64);

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create_application(&self, new: NewRtiApplication) -> RepositoryResult<RtiApplication>;

    async fn find_application(&self, id: i64) -> RepositoryResult<Option<RtiApplication>>;

    /// Newest first
    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<RtiApplication>>;

    async fn update_application(
        &self,
        id: i64,
        changes: RtiApplicationChanges,
    ) -> RepositoryResult<Option<RtiApplication>>;

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Option<RtiApplication>>;

    /// Returns false when no row matched
    async fn delete_application(&self, id: i64) -> RepositoryResult<bool>;

    async fn count_applications_by_status(&self) -> RepositoryResult<Vec<(ApplicationStatus, i64)>>;
}

#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    async fn create_consultation(&self, new: NewConsultation) -> RepositoryResult<Consultation>;

    async fn find_consultation(&self, id: i64) -> RepositoryResult<Option<Consultation>>;

    async fn list_consultations(
        &self,
        filter: &ConsultationFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Consultation>>;

    async fn update_consultation_status(
        &self,
        id: i64,
        status: LeadStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Option<Consultation>>;

    async fn delete_consultation(&self, id: i64) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait CallbackRepository: Send + Sync {
    async fn create_callback(&self, new: NewCallbackRequest) -> RepositoryResult<CallbackRequest>;

    async fn find_callback(&self, id: i64) -> RepositoryResult<Option<CallbackRequest>>;

    async fn list_callbacks(
        &self,
        filter: &CallbackFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<CallbackRequest>>;

    async fn update_callback_status(
        &self,
        id: i64,
        status: LeadStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Option<CallbackRequest>>;

    async fn delete_callback(&self, id: i64) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait StateRepository: Send + Sync {
    async fn create_state(&self, new: NewState) -> RepositoryResult<State>;

    /// Active states ordered by name
    async fn list_active_states(&self) -> RepositoryResult<Vec<State>>;

    async fn find_state_by_slug(&self, slug: &str) -> RepositoryResult<Option<State>>;

    async fn update_state(&self, id: i64, changes: StateChanges) -> RepositoryResult<Option<State>>;

    async fn delete_state(&self, id: i64) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, new: NewUser) -> RepositoryResult<User>;

    async fn find_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}

/// Everything the HTTP layer needs from storage
#[async_trait]
pub trait Store:
    ApplicationRepository
    + ConsultationRepository
    + CallbackRepository
    + StateRepository
    + UserRepository
{
    /// Liveness check used by /health
    async fn ping(&self) -> RepositoryResult<()>;
}

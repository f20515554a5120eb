// MySQL implementation of the repository traits using diesel-async

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::mysql::Mysql;
use diesel::prelude::*;
use diesel_async::{AsyncMysqlConnection, RunQueryDsl};

use crate::db::diesel_pool::DieselPool;
use crate::db::store::{
    ApplicationRepository, CallbackRepository, ConsultationRepository, Page, RepositoryResult,
    StateRepository, Store, UserRepository,
};
use crate::models::{
    ApplicationFilter, ApplicationStatus, CallbackFilter, CallbackRequest, Consultation,
    ConsultationFilter, LeadStatus, NewCallbackRequest, NewConsultation, NewRtiApplication,
    NewState, NewUser, Pagination, RtiApplication, RtiApplicationChanges, State, StateChanges,
    User,
};
use crate::schema::{callback_requests, consultations, rti_applications, states, users};

diesel::define_sql_function! {
    /// MySQL `LAST_INSERT_ID()`, scoped to the connection that ran the insert
    fn last_insert_id() -> diesel::sql_types::Unsigned<diesel::sql_types::BigInt>;
}

/// Repository backed by the shared bb8 pool
#[derive(Clone)]
pub struct DieselStore {
    pool: DieselPool,
}

impl DieselStore {
    pub fn new(pool: DieselPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DieselPool {
        &self.pool
    }
}

async fn inserted_id(conn: &mut AsyncMysqlConnection) -> RepositoryResult<i64> {
    let id: u64 = diesel::select(last_insert_id()).get_result(conn).await?;
    Ok(id as i64)
}

// =============================================================================
// FILTERS
// =============================================================================

fn filtered_applications(filter: &ApplicationFilter) -> rti_applications::BoxedQuery<'static, Mysql> {
    let mut query = rti_applications::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(rti_applications::status.eq(status));
    }
    if let Some(state_id) = filter.state_id {
        query = query.filter(rti_applications::state_id.eq(state_id));
    }
    if let Some(service_id) = filter.service_id {
        query = query.filter(rti_applications::service_id.eq(service_id));
    }
    if let Some(user_id) = filter.user_id {
        query = query.filter(rti_applications::user_id.eq(user_id));
    }
    query
}

fn filtered_consultations(filter: &ConsultationFilter) -> consultations::BoxedQuery<'static, Mysql> {
    let mut query = consultations::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(consultations::status.eq(status));
    }
    if let Some(slug) = &filter.state_slug {
        query = query.filter(consultations::state_slug.eq(slug.clone()));
    }
    if let Some(source) = &filter.source {
        query = query.filter(consultations::source.eq(source.clone()));
    }
    query
}

fn filtered_callbacks(filter: &CallbackFilter) -> callback_requests::BoxedQuery<'static, Mysql> {
    let mut query = callback_requests::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(callback_requests::status.eq(status));
    }
    if let Some(slug) = &filter.state_slug {
        query = query.filter(callback_requests::state_slug.eq(slug.clone()));
    }
    query
}

// =============================================================================
// RTI APPLICATIONS
// =============================================================================

#[async_trait]
impl ApplicationRepository for DieselStore {
    async fn create_application(&self, new: NewRtiApplication) -> RepositoryResult<RtiApplication> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(rti_applications::table)
            .values(&new)
            .execute(&mut conn)
            .await?;
        let id = inserted_id(&mut conn).await?;

        let application = rti_applications::table
            .find(id)
            .select(RtiApplication::as_select())
            .first(&mut conn)
            .await?;
        Ok(application)
    }

    async fn find_application(&self, id: i64) -> RepositoryResult<Option<RtiApplication>> {
        let mut conn = self.pool.get().await?;

        let application = rti_applications::table
            .find(id)
            .select(RtiApplication::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(application)
    }

    async fn list_applications(
        &self,
        filter: &ApplicationFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<RtiApplication>> {
        let mut conn = self.pool.get().await?;

        let total: i64 = filtered_applications(filter)
            .count()
            .get_result(&mut conn)
            .await?;

        let items = filtered_applications(filter)
            .select(RtiApplication::as_select())
            .order((rti_applications::created_at.desc(), rti_applications::id.desc()))
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn update_application(
        &self,
        id: i64,
        changes: RtiApplicationChanges,
    ) -> RepositoryResult<Option<RtiApplication>> {
        let mut conn = self.pool.get().await?;

        diesel::update(rti_applications::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await?;

        let application = rti_applications::table
            .find(id)
            .select(RtiApplication::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(application)
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Option<RtiApplication>> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().naive_utc();
        let target = rti_applications::table.find(id);

        match notes {
            Some(notes) => {
                diesel::update(target)
                    .set((
                        rti_applications::status.eq(status),
                        rti_applications::notes.eq(notes),
                        rti_applications::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await?
            },
            None => {
                diesel::update(target)
                    .set((
                        rti_applications::status.eq(status),
                        rti_applications::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await?
            },
        };

        // MySQL reports zero affected rows for a no-op update, so re-read instead
        let application = rti_applications::table
            .find(id)
            .select(RtiApplication::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(application)
    }

    async fn delete_application(&self, id: i64) -> RepositoryResult<bool> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(rti_applications::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }

    async fn count_applications_by_status(&self) -> RepositoryResult<Vec<(ApplicationStatus, i64)>> {
        let mut conn = self.pool.get().await?;

        let counts = rti_applications::table
            .group_by(rti_applications::status)
            .select((rti_applications::status, count_star()))
            .load::<(ApplicationStatus, i64)>(&mut conn)
            .await?;
        Ok(counts)
    }
}

// =============================================================================
// CONSULTATIONS
// =============================================================================

#[async_trait]
impl ConsultationRepository for DieselStore {
    async fn create_consultation(&self, new: NewConsultation) -> RepositoryResult<Consultation> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(consultations::table)
            .values(&new)
            .execute(&mut conn)
            .await?;
        let id = inserted_id(&mut conn).await?;

        let consultation = consultations::table
            .find(id)
            .select(Consultation::as_select())
            .first(&mut conn)
            .await?;
        Ok(consultation)
    }

    async fn find_consultation(&self, id: i64) -> RepositoryResult<Option<Consultation>> {
        let mut conn = self.pool.get().await?;

        let consultation = consultations::table
            .find(id)
            .select(Consultation::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(consultation)
    }

    async fn list_consultations(
        &self,
        filter: &ConsultationFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<Consultation>> {
        let mut conn = self.pool.get().await?;

        let total: i64 = filtered_consultations(filter)
            .count()
            .get_result(&mut conn)
            .await?;

        let items = filtered_consultations(filter)
            .select(Consultation::as_select())
            .order((consultations::created_at.desc(), consultations::id.desc()))
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn update_consultation_status(
        &self,
        id: i64,
        status: LeadStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Option<Consultation>> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().naive_utc();
        let target = consultations::table.find(id);

        match notes {
            Some(notes) => {
                diesel::update(target)
                    .set((
                        consultations::status.eq(status),
                        consultations::notes.eq(notes),
                        consultations::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await?
            },
            None => {
                diesel::update(target)
                    .set((consultations::status.eq(status), consultations::updated_at.eq(now)))
                    .execute(&mut conn)
                    .await?
            },
        };

        let consultation = consultations::table
            .find(id)
            .select(Consultation::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(consultation)
    }

    async fn delete_consultation(&self, id: i64) -> RepositoryResult<bool> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(consultations::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}

// =============================================================================
// CALLBACK REQUESTS
// =============================================================================

#[async_trait]
impl CallbackRepository for DieselStore {
    async fn create_callback(&self, new: NewCallbackRequest) -> RepositoryResult<CallbackRequest> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(callback_requests::table)
            .values(&new)
            .execute(&mut conn)
            .await?;
        let id = inserted_id(&mut conn).await?;

        let callback = callback_requests::table
            .find(id)
            .select(CallbackRequest::as_select())
            .first(&mut conn)
            .await?;
        Ok(callback)
    }

    async fn find_callback(&self, id: i64) -> RepositoryResult<Option<CallbackRequest>> {
        let mut conn = self.pool.get().await?;

        let callback = callback_requests::table
            .find(id)
            .select(CallbackRequest::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(callback)
    }

    async fn list_callbacks(
        &self,
        filter: &CallbackFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<CallbackRequest>> {
        let mut conn = self.pool.get().await?;

        let total: i64 = filtered_callbacks(filter)
            .count()
            .get_result(&mut conn)
            .await?;

        let items = filtered_callbacks(filter)
            .select(CallbackRequest::as_select())
            .order((callback_requests::created_at.desc(), callback_requests::id.desc()))
            .offset(pagination.offset())
            .limit(pagination.limit())
            .load(&mut conn)
            .await?;

        Ok((items, total))
    }

    async fn update_callback_status(
        &self,
        id: i64,
        status: LeadStatus,
        notes: Option<String>,
    ) -> RepositoryResult<Option<CallbackRequest>> {
        let mut conn = self.pool.get().await?;
        let now = Utc::now().naive_utc();
        let target = callback_requests::table.find(id);

        match notes {
            Some(notes) => {
                diesel::update(target)
                    .set((
                        callback_requests::status.eq(status),
                        callback_requests::notes.eq(notes),
                        callback_requests::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await?
            },
            None => {
                diesel::update(target)
                    .set((
                        callback_requests::status.eq(status),
                        callback_requests::updated_at.eq(now),
                    ))
                    .execute(&mut conn)
                    .await?
            },
        };

        let callback = callback_requests::table
            .find(id)
            .select(CallbackRequest::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(callback)
    }

    async fn delete_callback(&self, id: i64) -> RepositoryResult<bool> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(callback_requests::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}

// =============================================================================
// STATES
// =============================================================================

#[async_trait]
impl StateRepository for DieselStore {
    async fn create_state(&self, new: NewState) -> RepositoryResult<State> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(states::table)
            .values(&new)
            .execute(&mut conn)
            .await?;
        let id = inserted_id(&mut conn).await?;

        let state = states::table
            .find(id)
            .select(State::as_select())
            .first(&mut conn)
            .await?;
        Ok(state)
    }

    async fn list_active_states(&self) -> RepositoryResult<Vec<State>> {
        let mut conn = self.pool.get().await?;

        let states = states::table
            .filter(states::is_active.eq(true))
            .select(State::as_select())
            .order(states::name.asc())
            .load(&mut conn)
            .await?;
        Ok(states)
    }

    async fn find_state_by_slug(&self, slug: &str) -> RepositoryResult<Option<State>> {
        let mut conn = self.pool.get().await?;

        let state = states::table
            .filter(states::slug.eq(slug))
            .select(State::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(state)
    }

    async fn update_state(&self, id: i64, changes: StateChanges) -> RepositoryResult<Option<State>> {
        let mut conn = self.pool.get().await?;

        diesel::update(states::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await?;

        let state = states::table
            .find(id)
            .select(State::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(state)
    }

    async fn delete_state(&self, id: i64) -> RepositoryResult<bool> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(states::table.find(id))
            .execute(&mut conn)
            .await?;
        Ok(deleted > 0)
    }
}

// =============================================================================
// USERS
// =============================================================================

#[async_trait]
impl UserRepository for DieselStore {
    async fn create_user(&self, new: NewUser) -> RepositoryResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(&new)
            .execute(&mut conn)
            .await?;
        let id = inserted_id(&mut conn).await?;

        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let mut conn = self.pool.get().await?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }
}

#[async_trait]
impl Store for DieselStore {
    async fn ping(&self) -> RepositoryResult<()> {
        let mut conn = self.pool.get().await?;
        diesel::sql_query("SELECT 1").execute(&mut conn).await?;
        Ok(())
    }
}

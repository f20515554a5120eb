// State reference data management

use std::sync::Arc;

use crate::db::{RepositoryError, Store};
use crate::models::{CreateStateRequest, State, UpdateStateRequest};
use crate::utils::{ApiError, ApiResult};

const RESOURCE: &str = "State";

pub struct StateService {
    store: Arc<dyn Store>,
}

fn conflict_as_duplicate_slug(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::Conflict(_) => ApiError::Conflict("State with this slug".to_string()),
        other => other.into(),
    }
}

impl StateService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_active(&self) -> ApiResult<Vec<State>> {
        Ok(self.store.list_active_states().await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> ApiResult<State> {
        self.store
            .find_state_by_slug(&slug.trim().to_lowercase())
            .await?
            .ok_or(ApiError::NotFound(RESOURCE))
    }

    pub async fn create(&self, request: CreateStateRequest) -> ApiResult<State> {
        let new = request.into_new_state().map_err(ApiError::Validation)?;
        self.store
            .create_state(new)
            .await
            .map_err(conflict_as_duplicate_slug)
    }

    pub async fn update(&self, id: i64, request: UpdateStateRequest) -> ApiResult<State> {
        let changes = request.into_changes().map_err(ApiError::Validation)?;
        self.store
            .update_state(id, changes)
            .await
            .map_err(conflict_as_duplicate_slug)?
            .ok_or(ApiError::NotFound(RESOURCE))
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if self.store.delete_state(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound(RESOURCE))
        }
    }
}

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    errors::AppError,
    repositories::{CrudRepository, Record},
};

/// `?id=` selector shared by the get, update and delete endpoints.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Record id
    pub id: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted(resource: &str, id: i64) -> Self {
        Self {
            message: format!("{} with id {} deleted", resource, id),
        }
    }
}

/// Loads a record or fails with the resource's not-found error.
pub async fn find_or_not_found<M, R>(
    repository: &R,
    resource: &'static str,
    id: i64,
) -> Result<M, AppError>
where
    M: Record,
    R: CrudRepository<M> + ?Sized,
{
    repository.find_by_id(id).await?.ok_or_else(|| {
        log::debug!("{} with id {} not found", resource, id);
        AppError::EntityNotFound { resource, id }
    })
}

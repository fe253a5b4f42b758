//! City CRUD rules on top of [`Storage`]. Every city belongs to an existing state.

use models::city;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::payload::{self, JsonObject};
use crate::state_service;
use crate::storage::{Kind, Record, Storage};

/// Cities of `state_id`, oldest first. Unknown states are `NotFound`.
pub async fn list_for_state(storage: &dyn Storage, state_id: &str) -> Result<Vec<city::Model>, ServiceError> {
    let owner = state_service::get(storage, state_id).await?;
    let mut cities: Vec<city::Model> = storage
        .all(Some(Kind::City))
        .await?
        .into_iter()
        .filter_map(Record::into_city)
        .filter(|c| c.state_id == owner.id)
        .collect();
    cities.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(cities)
}

pub async fn get(storage: &dyn Storage, id: &str) -> Result<city::Model, ServiceError> {
    storage
        .get(Kind::City, id)
        .await?
        .and_then(Record::into_city)
        .ok_or_else(|| ServiceError::not_found("city"))
}

/// Create a city under `state_id`; any `state_id` inside `body` is ignored.
#[instrument(skip(storage, body))]
pub async fn create(storage: &dyn Storage, state_id: &str, body: &JsonObject) -> Result<city::Model, ServiceError> {
    let owner = state_service::get(storage, state_id).await?;
    let name = payload::required_name(body)?;
    let created = city::Model::create(&owner.id, name)?;
    storage.new(created.clone().into()).await?;
    storage.save().await?;
    info!(id = %created.id, state_id = %owner.id, "created city");
    Ok(created)
}

#[instrument(skip(storage, body))]
pub async fn update(storage: &dyn Storage, id: &str, body: &JsonObject) -> Result<city::Model, ServiceError> {
    let mut existing = get(storage, id).await?;
    payload::ensure_not_empty(body)?;
    if let Some(name) = payload::optional_name(body)? {
        existing.rename(name)?;
    }
    storage.new(existing.clone().into()).await?;
    storage.save().await?;
    info!(id = %existing.id, "updated city");
    Ok(existing)
}

#[instrument(skip(storage))]
pub async fn delete(storage: &dyn Storage, id: &str) -> Result<(), ServiceError> {
    let existing = get(storage, id).await?;
    storage.delete(Kind::City, &existing.id).await?;
    storage.save().await?;
    info!(id = %existing.id, "deleted city");
    Ok(())
}

//! State CRUD rules on top of [`Storage`].

use models::state;
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::payload::{self, JsonObject};
use crate::storage::{Kind, Record, Storage};

/// All states, oldest first.
pub async fn list(storage: &dyn Storage) -> Result<Vec<state::Model>, ServiceError> {
    let mut states: Vec<state::Model> = storage
        .all(Some(Kind::State))
        .await?
        .into_iter()
        .filter_map(Record::into_state)
        .collect();
    states.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(states)
}

pub async fn get(storage: &dyn Storage, id: &str) -> Result<state::Model, ServiceError> {
    storage
        .get(Kind::State, id)
        .await?
        .and_then(Record::into_state)
        .ok_or_else(|| ServiceError::not_found("state"))
}

#[instrument(skip(storage, body))]
pub async fn create(storage: &dyn Storage, body: &JsonObject) -> Result<state::Model, ServiceError> {
    let name = payload::required_name(body)?;
    let created = state::Model::create(name)?;
    storage.new(created.clone().into()).await?;
    storage.save().await?;
    info!(id = %created.id, "created state");
    Ok(created)
}

/// Apply whitelisted fields of `body`; `id` and timestamps are never taken from it.
#[instrument(skip(storage, body))]
pub async fn update(storage: &dyn Storage, id: &str, body: &JsonObject) -> Result<state::Model, ServiceError> {
    let mut existing = get(storage, id).await?;
    payload::ensure_not_empty(body)?;
    let ignored: Vec<&str> = payload::IMMUTABLE_FIELDS
        .iter()
        .copied()
        .filter(|k| body.contains_key(*k))
        .collect();
    if !ignored.is_empty() {
        debug!(?ignored, "ignoring immutable fields");
    }
    if let Some(name) = payload::optional_name(body)? {
        existing.rename(name)?;
    }
    storage.new(existing.clone().into()).await?;
    storage.save().await?;
    info!(id = %existing.id, "updated state");
    Ok(existing)
}

/// Delete a state together with every city that references it.
#[instrument(skip(storage))]
pub async fn delete(storage: &dyn Storage, id: &str) -> Result<(), ServiceError> {
    let existing = get(storage, id).await?;
    let cities: Vec<String> = storage
        .all(Some(Kind::City))
        .await?
        .into_iter()
        .filter_map(Record::into_city)
        .filter(|c| c.state_id == existing.id)
        .map(|c| c.id)
        .collect();
    for city_id in &cities {
        storage.delete(Kind::City, city_id).await?;
    }
    storage.delete(Kind::State, &existing.id).await?;
    storage.save().await?;
    info!(id = %existing.id, cities = cities.len(), "deleted state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file::FileStorage;
    use serde_json::json;
    use std::sync::Arc;

    async fn setup_store() -> Arc<FileStorage> {
        let tmp = std::env::temp_dir().join(format!("state_service_{}.json", uuid::Uuid::new_v4()));
        FileStorage::open(tmp).await.expect("store init")
    }

    fn obj(v: serde_json::Value) -> JsonObject {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn state_crud_and_validation() {
        let store = setup_store().await;

        // create
        let created = create(store.as_ref(), &obj(json!({"name": "California"}))).await.expect("create ok");
        assert_eq!(created.name, "California");

        // list / get
        assert!(list(store.as_ref()).await.unwrap().iter().any(|s| s.id == created.id));
        assert_eq!(get(store.as_ref(), &created.id).await.unwrap(), created);

        // update
        let updated = update(store.as_ref(), &created.id, &obj(json!({"name": "Nevada"}))).await.expect("update ok");
        assert_eq!(updated.name, "Nevada");
        assert_eq!(updated.created_at, created.created_at);

        // delete
        delete(store.as_ref(), &created.id).await.expect("delete ok");
        assert!(matches!(get(store.as_ref(), &created.id).await, Err(ServiceError::NotFound(_))));

        // validation errors
        assert!(matches!(create(store.as_ref(), &obj(json!({}))).await, Err(ServiceError::Validation(_))));
        assert!(matches!(create(store.as_ref(), &obj(json!({"name": 12}))).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn create_ignores_client_supplied_identity() {
        let store = setup_store().await;
        let body = obj(json!({"name": "Ohio", "id": "fixed", "created_at": "2000-01-01T00:00:00Z"}));
        let created = create(store.as_ref(), &body).await.unwrap();
        assert_ne!(created.id, "fixed");
        assert!(created.created_at.timestamp() > 946_684_800);
    }

    #[tokio::test]
    async fn update_leaves_immutable_fields_alone() {
        let store = setup_store().await;
        let created = create(store.as_ref(), &obj(json!({"name": "Texas"}))).await.unwrap();
        let body = obj(json!({
            "id": "other",
            "created_at": "2000-01-01T00:00:00Z",
            "updated_at": "2000-01-01T00:00:00Z"
        }));
        let updated = update(store.as_ref(), &created.id, &body).await.unwrap();
        assert_eq!(updated, created);
        assert_eq!(get(store.as_ref(), &created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_missing_or_empty() {
        let store = setup_store().await;
        assert!(matches!(
            update(store.as_ref(), "nope", &obj(json!({"name": "X"}))).await,
            Err(ServiceError::NotFound(_))
        ));
        let created = create(store.as_ref(), &obj(json!({"name": "Maine"}))).await.unwrap();
        assert!(matches!(
            update(store.as_ref(), &created.id, &JsonObject::new()).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let store = setup_store().await;
        for name in ["A", "B", "C"] {
            create(store.as_ref(), &obj(json!({"name": name}))).await.unwrap();
        }
        let states = list(store.as_ref()).await.unwrap();
        assert_eq!(states.len(), 3);
        assert!(states
            .windows(2)
            .all(|w| (w[0].created_at, &w[0].id) <= (w[1].created_at, &w[1].id)));
    }
}

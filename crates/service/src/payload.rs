//! Field extraction from request bodies.
//!
//! Only whitelisted fields are ever read; everything else in a body is ignored.

use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub type JsonObject = Map<String, Value>;

/// Fields no request may change once an entity exists.
pub const IMMUTABLE_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", "state_id"];

/// `name` is mandatory on create.
pub fn required_name(body: &JsonObject) -> Result<&str, ServiceError> {
    optional_name(body)?.ok_or_else(|| ServiceError::Validation("Missing name".into()))
}

pub fn optional_name(body: &JsonObject) -> Result<Option<&str>, ServiceError> {
    match body.get("name") {
        None => Ok(None),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.as_str())),
        Some(_) => Err(ServiceError::Validation("Invalid name".into())),
    }
}

/// Whether an update body carries at least one key at all.
pub fn ensure_not_empty(body: &JsonObject) -> Result<(), ServiceError> {
    if body.is_empty() {
        return Err(ServiceError::Validation("Not a JSON".into()));
    }
    Ok(())
}

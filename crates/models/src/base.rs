//! Attributes every entity shares: identifier, timestamps and name rules.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::errors::ModelError;

/// Fresh UUID v4 identifier in its hyphenated string form.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time truncated to microseconds so it survives a database round trip.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if name.chars().count() > 128 {
        return Err(ModelError::Validation("name too long (<=128)".into()));
    }
    Ok(())
}

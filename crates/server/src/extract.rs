use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::Value;
use service::payload::JsonObject;
use tracing::debug;

use crate::errors::ApiError;

/// Request body that must be a JSON object.
///
/// A missing body, a non-JSON content type, malformed JSON or a non-object
/// value are all rejected with `400 {"error": "Not a JSON"}`.
pub struct JsonBody(pub JsonObject);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(map))) => Ok(Self(map)),
            Ok(Json(other)) => {
                debug!(kind = json_kind(&other), "rejected non-object body");
                Err(ApiError::not_a_json())
            }
            Err(rejection) => {
                debug!(%rejection, "rejected request body");
                Err(ApiError::not_a_json())
            }
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

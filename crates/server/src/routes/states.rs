use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Empty;
use service::{state_service, storage::Record};

use super::AppState;
use crate::errors::ApiError;
use crate::extract::JsonBody;

#[utoipa::path(
    get, path = "/states", tag = "states",
    responses((status = 200, description = "All states", body = [crate::openapi::StateDoc]))
)]
pub async fn list_states(State(app): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let states = state_service::list(app.storage.as_ref()).await?;
    Ok(Json(states.into_iter().map(Record::from).collect()))
}

#[utoipa::path(
    get, path = "/states/{state_id}", tag = "states",
    params(("state_id" = String, Path, description = "State id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::StateDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_state(
    State(app): State<AppState>,
    Path(state_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let state = state_service::get(app.storage.as_ref(), &state_id).await?;
    Ok(Json(state.into()))
}

#[utoipa::path(
    post, path = "/states", tag = "states",
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::StateDoc),
        (status = 400, description = "Not a JSON / Missing name", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_state(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let created = state_service::create(app.storage.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put, path = "/states/{state_id}", tag = "states",
    params(("state_id" = String, Path, description = "State id")),
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::StateDoc),
        (status = 400, description = "Not a JSON", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_state(
    State(app): State<AppState>,
    Path(state_id): Path<String>,
    body: Result<JsonBody, ApiError>,
) -> Result<Json<Record>, ApiError> {
    // unknown ids are 404 even when the body is also bad
    state_service::get(app.storage.as_ref(), &state_id).await?;
    let JsonBody(body) = body?;
    let updated = state_service::update(app.storage.as_ref(), &state_id, &body).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete, path = "/states/{state_id}", tag = "states",
    params(("state_id" = String, Path, description = "State id")),
    responses(
        (status = 200, description = "Deleted with its cities"),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_state(
    State(app): State<AppState>,
    Path(state_id): Path<String>,
) -> Result<Json<Empty>, ApiError> {
    state_service::delete(app.storage.as_ref(), &state_id).await?;
    Ok(Json(Empty::default()))
}

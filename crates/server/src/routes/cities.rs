use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::Empty;
use service::{city_service, state_service, storage::Record};

use super::AppState;
use crate::errors::ApiError;
use crate::extract::JsonBody;

#[utoipa::path(
    get, path = "/states/{state_id}/cities", tag = "cities",
    params(("state_id" = String, Path, description = "Owning state id")),
    responses(
        (status = 200, description = "Cities of the state", body = [crate::openapi::CityDoc]),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_cities(
    State(app): State<AppState>,
    Path(state_id): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let cities = city_service::list_for_state(app.storage.as_ref(), &state_id).await?;
    Ok(Json(cities.into_iter().map(Record::from).collect()))
}

#[utoipa::path(
    get, path = "/cities/{city_id}", tag = "cities",
    params(("city_id" = String, Path, description = "City id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::CityDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_city(
    State(app): State<AppState>,
    Path(city_id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let city = city_service::get(app.storage.as_ref(), &city_id).await?;
    Ok(Json(city.into()))
}

#[utoipa::path(
    post, path = "/states/{state_id}/cities", tag = "cities",
    params(("state_id" = String, Path, description = "Owning state id")),
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CityDoc),
        (status = 400, description = "Not a JSON / Missing name", body = crate::openapi::ErrorDoc),
        (status = 404, description = "State not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_city(
    State(app): State<AppState>,
    Path(state_id): Path<String>,
    body: Result<JsonBody, ApiError>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    state_service::get(app.storage.as_ref(), &state_id).await?;
    let JsonBody(body) = body?;
    let created = city_service::create(app.storage.as_ref(), &state_id, &body).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    put, path = "/cities/{city_id}", tag = "cities",
    params(("city_id" = String, Path, description = "City id")),
    request_body = crate::openapi::NameInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CityDoc),
        (status = 400, description = "Not a JSON", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update_city(
    State(app): State<AppState>,
    Path(city_id): Path<String>,
    body: Result<JsonBody, ApiError>,
) -> Result<Json<Record>, ApiError> {
    city_service::get(app.storage.as_ref(), &city_id).await?;
    let JsonBody(body) = body?;
    let updated = city_service::update(app.storage.as_ref(), &city_id, &body).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete, path = "/cities/{city_id}", tag = "cities",
    params(("city_id" = String, Path, description = "City id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_city(
    State(app): State<AppState>,
    Path(city_id): Path<String>,
) -> Result<Json<Empty>, ApiError> {
    city_service::delete(app.storage.as_ref(), &city_id).await?;
    Ok(Json(Empty::default()))
}

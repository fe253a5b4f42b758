use std::{sync::Arc, time::Instant};

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use common::{metrics, types::Health};
use service::storage::Storage;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::errors::ApiError;
use crate::openapi::ApiDoc;

pub mod cities;
pub mod states;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics_handler() -> impl IntoResponse {
    metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let start = Instant::now();
    let response = next.run(req).await;
    metrics::HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), response.status().as_str()])
        .inc();
    metrics::HTTP_REQUEST_DURATION.observe(start.elapsed().as_secs_f64());
    response
}

/// State and City resources, mounted at the root and under `/api/v1`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/states", get(states::list_states).post(states::create_state))
        .route(
            "/states/:state_id",
            get(states::get_state).put(states::update_state).delete(states::delete_state),
        )
        .route("/states/:state_id/cities", get(cities::list_cities).post(cities::create_city))
        .route(
            "/cities/:city_id",
            get(cities::get_city).put(cities::update_city).delete(cities::delete_city),
        )
}

/// Build the full application router, including resources, health, metrics and docs
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = api_routes();

    Router::new()
        .merge(api.clone())
        .nest("/api/v1", api)
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

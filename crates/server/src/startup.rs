use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{extract::Request, http::HeaderValue, Router, ServiceExt};
use configs::AppConfig;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePathLayer,
};
use tracing::{error, info, warn};

use crate::routes::{self, AppState};

/// CORS for the configured origins; `"*"` allows any origin.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::very_permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serve `router` on `listener` until `shutdown` resolves. Trailing slashes are ignored.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Public entry: open storage, build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    service::runtime::ensure_env(&cfg).await?;

    let storage = service::storage::open(&cfg).await?;
    let state = AppState { storage: Arc::clone(&storage) };
    let app = routes::build_router(state, build_cors(&cfg.server.cors_origins));

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, storage = ?cfg.storage.kind, "starting hbnb api");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown_signal()).await?;

    storage.close().await?;
    info!(event = "storage_closed", "storage closed");
    Ok(())
}

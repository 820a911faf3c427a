use crate::handlers;
use axum::{routing::post, Router};
use centrallog_sink::LogFile;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the ingestion API.
pub struct AppState {
    pub log_file: LogFile,
}

impl AppState {
    pub fn new(log_file: LogFile) -> Self {
        Self { log_file }
    }
}

/// Build the Axum router. `POST /log` is the only route.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/log", post(handlers::ingest::ingest_log))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr()?.port();
    let app = build_router(state);

    info!("Central Log Service running on port {port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Bind `addr` and serve.
pub async fn start<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, log_file = %state.log_file.path().display(), "Listener bound");
    serve(listener, state, shutdown).await
}

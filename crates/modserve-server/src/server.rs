//! axum router and listener.

use crate::state::ServeState;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use modserve_core::{ServeConfig, ServeError};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the router. Every GET path goes through [`ServeState::load`].
pub fn router(state: Arc<ServeState>) -> Router {
    Router::new()
        .route("/", get(serve_path))
        .route("/*path", get(serve_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already-bound listener until Ctrl+C.
pub async fn serve(listener: TcpListener, state: Arc<ServeState>) -> io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Bind `config.host:config.port` and serve `config.root`.
pub async fn run_server(config: ServeConfig) -> Result<(), ServeError> {
    let state = Arc::new(ServeState::new(config)?);
    let config = state.config();

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        root = %config.root.display(),
        addr = %listener.local_addr()?,
        "serving content"
    );

    serve(listener, state).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested, exiting");
    } else {
        // No signal handler available: run until the process is killed.
        std::future::pending::<()>().await;
    }
}

/// Resolve, read and (for scripts) rewrite the requested file.
///
/// `Uri::path` already excludes the query string.
async fn serve_path(State(state): State<Arc<ServeState>>, uri: Uri) -> Response {
    let url_path = uri.path().to_string();

    let result = tokio::task::spawn_blocking(move || state.load(&url_path))
        .await
        .map_err(|e| ServeError::Join(e.to_string()))
        .and_then(|served| served);

    match result {
        Ok(served) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, served.content_type.to_string()),
                (header::CONTENT_LENGTH, served.body.len().to_string()),
            ],
            served.body,
        )
            .into_response(),
        Err(e) => error_response(&uri, e),
    }
}

fn error_response(uri: &Uri, err: ServeError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        warn!(uri = %uri, error = %err, "request failed");
    }
    (status, err.to_string()).into_response()
}

use axum::{
    body::Bytes,
    extract::Path,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::adapters;
use crate::config::Config;
use crate::dispatch::{dispatch, InboundRequest};
use crate::error::RelayError;
use crate::handlers::HandlerRegistry;

/// Immutable process-wide state threaded through the router. Built once at
/// startup; concurrent reads only.
pub struct AppState {
    pub registry: HandlerRegistry,
    pub config: Config,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "chatrelay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Relay endpoint: source key, destination platform, and destination
/// identifier all come from the path.
async fn hook(
    Extension(state): Extension<Arc<AppState>>,
    Path((source, adapter_kind, destination)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let request = InboundRequest::new(content_type, body.to_vec());

    let adapter = match adapters::new_adapter(&adapter_kind, &destination) {
        Ok(adapter) => adapter,
        Err(err) => return error_response(&source, &adapter_kind, err),
    };

    match dispatch(&state.registry, &state.config, &source, adapter.as_ref(), &request).await {
        Ok(response) => {
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, response.body).into_response()
        }
        Err(err) => error_response(&source, &adapter_kind, err),
    }
}

/// Maps a pipeline error to a response. The caller gets a minimal body; the
/// root cause goes to the server-side log.
fn error_response(source: &str, adapter_kind: &str, err: RelayError) -> axum::response::Response {
    let (status, label) = match &err {
        RelayError::Decode(_) | RelayError::Payload(_) => {
            (StatusCode::NOT_ACCEPTABLE, "request is not acceptable")
        }
        RelayError::ContentNotFound => (StatusCode::NOT_ACCEPTABLE, "content not found"),
        RelayError::UnknownSource(_) => (StatusCode::NOT_FOUND, "unknown source"),
        RelayError::InvalidDestination(_) => (StatusCode::BAD_REQUEST, "invalid destination"),
        RelayError::Transport(_) => (StatusCode::BAD_GATEWAY, "delivery failed"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
    };
    error!(
        source,
        adapter = adapter_kind,
        status = status.as_u16(),
        cause = %err,
        "relay request failed"
    );
    (status, Json(serde_json::json!({ "error": label }))).into_response()
}

/// Create the HTTP server with all routes
pub fn create_server(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/hooks/:source/:adapter/:destination", post(hook))
        .layer(Extension(state))
}

/// Start the HTTP server on the given port
pub async fn run_server(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("chatrelay listening on http://{}", addr);

    Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}

// File: livewatch-server/src/server.rs

use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use livewatch_common::models::StatusSnapshot;
use livewatch_core::Error;
use livewatch_core::services::StatusService;

/// Shared state for the Axum routes.
#[derive(Clone)]
pub struct AppState {
    pub status: Arc<StatusService>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Anything that escapes the aggregator (in practice, a roster load failure).
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Live status request failed: {}", self.0);
        let body = ErrorResponse {
            error: "Failed to fetch live status".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/live-status", get(live_status))
        .route("/health", get(health))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Runs the full aggregation on every request; nothing is cached here.
async fn live_status(State(state): State<AppState>) -> Result<Json<StatusSnapshot>, ApiError> {
    let snapshot = state.status.get_status().await?;
    Ok(Json(snapshot))
}

async fn health() -> &'static str {
    "ok"
}

/// Serves until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).await?;
    info!("Live status endpoint listening on http://{}/api/live-status", addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Live status endpoint shut down.");
    Ok(())
}

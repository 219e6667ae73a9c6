//! HTTP adapters - REST API for the travel assistant.
//!
//! - `POST /api/sessions` starts a conversation
//! - `POST /api/sessions/:id/messages` replies to it
//! - `GET /api/sessions/:id` returns the session view
//! - `DELETE /api/sessions/:id` cancels its run
//! - `GET /health` reports liveness

pub mod session;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::application::{SessionRegistry, WorkflowController};

pub use session::{session_routes, ErrorResponse, SessionHandlers, SessionResponse};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checked_at: String,
}

/// GET /health
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        checked_at: Utc::now().to_rfc3339(),
    };
    (StatusCode::OK, Json(payload))
}

/// Builds the full API router without middleware layers.
pub fn api_router(controller: Arc<WorkflowController>, registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/sessions",
            session_routes(SessionHandlers::new(controller, registry)),
        )
}

//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_session, get_session, reply_to_session, start_session, SessionHandlers,
};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(start_session))
        .route("/:id", get(get_session).delete(cancel_session))
        .route("/:id/messages", post(reply_to_session))
        .with_state(handlers)
}

//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::{SessionHandle, SessionRegistry, WorkflowController, WorkflowError};
use crate::domain::foundation::{CustomerId, SessionId};
use crate::domain::travel::TravelError;
use crate::domain::workflow::SessionState;

use super::dto::{
    CancelResponse, ErrorResponse, ReplyRequest, SessionResponse, StartSessionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    controller: Arc<WorkflowController>,
    registry: Arc<SessionRegistry>,
}

impl SessionHandlers {
    pub fn new(controller: Arc<WorkflowController>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            controller,
            registry,
        }
    }

    async fn find(&self, raw_id: &str) -> Result<Arc<SessionHandle>, Response> {
        let session_id = raw_id.parse::<SessionId>().map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid session ID")),
            )
                .into_response()
        })?;

        self.registry.get(&session_id).await.ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::not_found("Session", raw_id)),
            )
                .into_response()
        })
    }

    /// Discards the session once its run has ended.
    async fn release_if_finished(&self, state: &SessionState) {
        if state.is_completed() || state.is_aborted() {
            self.registry.remove(&state.id()).await;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Start a conversation
pub async fn start_session(
    State(handlers): State<SessionHandlers>,
    Json(req): Json<StartSessionRequest>,
) -> Response {
    let customer_id = match CustomerId::new(req.customer_id) {
        Ok(id) => id,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(e.to_string())))
                .into_response()
        }
    };
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Message cannot be empty")),
        )
            .into_response();
    }

    let mut state = SessionState::new(customer_id);
    if let Some(email) = req.customer_email {
        state = state.with_email(email);
    }
    if let Some(token) = req.payment_token {
        state = state.with_payment_token(token);
    }

    let handle = handlers.registry.insert(state).await;
    let mut state = handle.state().lock().await;

    let response = match handlers
        .controller
        .start(&mut state, &req.message, handle.cancel_token())
        .await
    {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(SessionResponse::after_run(&state, &outcome)),
        )
            .into_response(),
        Err(e) => handle_workflow_error(&state, e),
    };
    handlers.release_if_finished(&state).await;
    response
}

/// POST /api/sessions/:id/messages - Reply to a running conversation
pub async fn reply_to_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
    Json(req): Json<ReplyRequest>,
) -> Response {
    let handle = match handlers.find(&session_id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Message cannot be empty")),
        )
            .into_response();
    }

    let mut state = handle.state().lock().await;
    let response = match handlers
        .controller
        .reply(&mut state, &req.message, handle.cancel_token())
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(SessionResponse::after_run(&state, &outcome))).into_response(),
        Err(e) => handle_workflow_error(&state, e),
    };
    handlers.release_if_finished(&state).await;
    response
}

/// GET /api/sessions/:id - Get the session view
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let handle = match handlers.find(&session_id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    let state = handle.state().lock().await;
    (StatusCode::OK, Json(SessionResponse::from_state(&state))).into_response()
}

/// DELETE /api/sessions/:id - Cancel the conversation's run and discard it
pub async fn cancel_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let handle = match handlers.find(&session_id).await {
        Ok(handle) => handle,
        Err(response) => return response,
    };

    handlers.registry.cancel(&handle.id()).await;
    let response = CancelResponse {
        session_id: handle.id().to_string(),
        message: "Cancellation requested".to_string(),
    };
    (StatusCode::ACCEPTED, Json(response)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn status_for(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::StepFailed { source, .. } => match source {
            TravelError::Validation(_) => StatusCode::BAD_REQUEST,
            TravelError::PaymentDeclined { .. } => StatusCode::PAYMENT_REQUIRED,
            TravelError::RemoteService { .. } | TravelError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            TravelError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            TravelError::Cancelled => StatusCode::CONFLICT,
        },
        WorkflowError::TurnLimitExceeded { .. }
        | WorkflowError::Cancelled { .. }
        | WorkflowError::Aborted { .. }
        | WorkflowError::AlreadyCompleted
        | WorkflowError::InvalidTransition(_) => StatusCode::CONFLICT,
    }
}

fn handle_workflow_error(state: &SessionState, error: WorkflowError) -> Response {
    let status = status_for(&error);
    let mut details = json!({ "session_id": state.id().to_string() });
    if let Some(step) = error.step() {
        details["step"] = json!(step);
    }
    if let WorkflowError::StepFailed {
        source: TravelError::PaymentDeclined {
            decline_code: Some(code),
            ..
        },
        ..
    } = &error
    {
        details["decline_code"] = json!(code);
    }

    let body = ErrorResponse::new(error.code(), error.user_message()).with_details(details);
    (status, Json(body)).into_response()
}

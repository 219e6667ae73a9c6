//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::RunOutcome;
use crate::domain::conversation::{Message, MessageRole};
use crate::domain::travel::{Offer, OfferCategory};
use crate::domain::workflow::{SessionState, WorkflowStep};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub customer_id: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Tokenized payment method used if the customer books.
    #[serde(default)]
    pub payment_token: Option<String>,
    pub message: String,
}

/// A customer reply to a running conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Where a run stands after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    AwaitingReply,
    Completed,
    Aborted,
}

/// Session view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub customer_id: String,
    pub status: RunStatus,
    pub step: WorkflowStep,
    /// Assistant reply produced by this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub messages: Vec<MessageResponse>,
    pub offers: Vec<OfferResponse>,
    /// Categories whose search failed while others succeeded.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<OfferCategory>,
    pub booking_confirmed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<String>,
    pub turns: u32,
    pub created_at: String,
}

impl SessionResponse {
    pub fn from_state(state: &SessionState) -> Self {
        let status = if state.is_completed() {
            RunStatus::Completed
        } else if state.is_aborted() {
            RunStatus::Aborted
        } else {
            RunStatus::AwaitingReply
        };

        Self {
            id: state.id().to_string(),
            customer_id: state.customer_id().to_string(),
            status,
            step: state.current_step(),
            reply: None,
            messages: state
                .messages()
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .map(MessageResponse::from)
                .collect(),
            offers: state
                .search_results
                .iter()
                .flat_map(|(_, offers)| offers.iter())
                .map(OfferResponse::from)
                .collect(),
            unavailable: state.search_failures.iter().map(|f| f.category).collect(),
            booking_confirmed: state.booking_confirmed,
            confirmation_number: state.confirmation_number().map(str::to_string),
            turns: state.turns(),
            created_at: state.created_at().as_datetime().to_rfc3339(),
        }
    }

    /// The view after a run, carrying the reply it produced.
    pub fn after_run(state: &SessionState, outcome: &RunOutcome) -> Self {
        let mut response = Self::from_state(state);
        response.reply = match outcome {
            RunOutcome::AwaitingReply { reply } => Some(reply.clone()),
            RunOutcome::Completed { .. } => state
                .messages()
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::Assistant)
                .map(|m| m.content.clone()),
        };
        response
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub role: MessageRole,
    pub content: String,
}

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OfferResponse {
    pub id: String,
    pub category: OfferCategory,
    pub provider: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub amount_cents: i64,
    pub currency: String,
}

impl From<&Offer> for OfferResponse {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id.clone(),
            category: offer.category,
            provider: offer.provider.clone(),
            title: offer.title.clone(),
            description: offer.description.clone(),
            amount_cents: offer.price.amount_cents(),
            currency: offer.price.currency().to_string(),
        }
    }
}

/// Acknowledgement of a cancellation request.
#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub session_id: String,
    pub message: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

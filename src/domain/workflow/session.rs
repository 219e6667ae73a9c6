//! Per-run mutable session state.

use serde::Serialize;

use crate::domain::conversation::Message;
use crate::domain::foundation::{CustomerId, SessionId, StateMachine, Timestamp, ValidationError};
use crate::domain::travel::{
    BookingConfirmation, CategoryFailure, CustomerProfile, Offer, SearchParams, SearchResults,
};

use super::WorkflowStep;

/// State threaded through one workflow run.
///
/// Owned by exactly one run. The transcript is append-only; the step only
/// changes through validated transitions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    id: SessionId,
    customer_id: CustomerId,
    customer_email: Option<String>,
    payment_token: Option<String>,
    messages: Vec<Message>,
    current_step: WorkflowStep,
    pub search_params: SearchParams,
    pub search_results: SearchResults,
    #[serde(skip)]
    pub search_failures: Vec<CategoryFailure>,
    pub selected_options: Vec<Offer>,
    pub booking_confirmed: bool,
    pub confirmation: Option<BookingConfirmation>,
    pub customer_profile: Option<CustomerProfile>,
    /// Customer replies received after the opening message.
    turns: u32,
    /// Step at which the run failed, if it did.
    aborted_at: Option<WorkflowStep>,
    created_at: Timestamp,
}

impl SessionState {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            id: SessionId::new(),
            customer_id,
            customer_email: None,
            payment_token: None,
            messages: Vec::new(),
            current_step: WorkflowStep::INITIAL,
            search_params: SearchParams::default(),
            search_results: SearchResults::new(),
            search_failures: Vec::new(),
            selected_options: Vec::new(),
            booking_confirmed: false,
            confirmation: None,
            customer_profile: None,
            turns: 0,
            aborted_at: None,
            created_at: Timestamp::now(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_payment_token(mut self, token: impl Into<String>) -> Self {
        self.payment_token = Some(token.into());
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }

    pub fn payment_token(&self) -> Option<&str> {
        self.payment_token.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn current_step(&self) -> WorkflowStep {
        self.current_step
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_completed(&self) -> bool {
        self.current_step.is_terminal()
    }

    pub fn aborted_at(&self) -> Option<WorkflowStep> {
        self.aborted_at
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted_at.is_some()
    }

    pub fn confirmation_number(&self) -> Option<&str> {
        self.confirmation
            .as_ref()
            .map(|c| c.confirmation_number.as_str())
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Text of the most recent customer message.
    pub fn latest_customer_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
    }

    /// Marks the run as failed at the current step. No further steps run.
    pub fn abort(&mut self) {
        self.aborted_at = Some(self.current_step);
    }

    /// Records a customer reply.
    pub fn record_reply(&mut self, text: impl Into<String>) {
        self.turns += 1;
        self.messages.push(Message::user(text));
    }

    /// Moves to `target` if the transition table allows it.
    pub fn advance(&mut self, target: WorkflowStep) -> Result<(), ValidationError> {
        self.current_step = self.current_step.transition_to(target)?;
        Ok(())
    }
}

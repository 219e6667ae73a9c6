//! Workflow Controller - drives a session through the booking steps.
//!
//! A run executes steps strictly in sequence until it needs customer input,
//! completes, or fails:
//!
//! ```text
//! understand_request ─► retrieve_memory ─► search_options ─► present_options
//!        ▲                                        ▲                │ (reply)
//!        └──────────── clarify ───────────────────┴── revise ──────┤
//!                                                                  ▼ book
//!                                  completed ◄─ send_confirmation ◄─ process_booking
//! ```
//!
//! Cancellation is checked between steps. Every step runs under a total
//! deadline. Customer memory is written only after both the booking and
//! its confirmation email succeeded.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::application::booking_client::BookingClient;
use crate::application::conversation_engine::{ConversationEngine, ModelReply};
use crate::application::inventory_search::InventorySearchClient;
use crate::domain::conversation::{
    search_params_from_tool_calls, ItineraryRequest, Message, TravelTool,
};
use crate::domain::foundation::ValidationError;
use crate::domain::travel::{
    BookingConfirmation, BookingRecord, BookingSelection, ProfileUpdate, TravelError,
};
use crate::domain::workflow::{IntentClassifier, SelectionResolver, SessionState, WorkflowStep};
use crate::ports::CustomerMemory;

use super::WorkflowError;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The assistant replied and waits for the customer.
    AwaitingReply { reply: String },
    /// The booking is confirmed and the customer notified.
    Completed { confirmation: BookingConfirmation },
}

/// Limits applied to every run.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Customer replies allowed before the run gives up.
    pub max_turns: u32,
    /// Total deadline for one step, including retries.
    pub step_timeout: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_turns: 10,
            step_timeout: Duration::from_secs(45),
        }
    }
}

/// Result of executing one step.
enum StepResult {
    Advance(WorkflowStep),
    Await(String),
}

/// Collaborators the controller orchestrates.
pub struct WorkflowDependencies {
    pub engine: Arc<ConversationEngine>,
    pub search: Arc<InventorySearchClient>,
    pub booking: Arc<BookingClient>,
    pub memory: Arc<dyn CustomerMemory>,
    pub classifier: Arc<dyn IntentClassifier>,
}

/// Executes workflow steps against a [`SessionState`].
pub struct WorkflowController {
    engine: Arc<ConversationEngine>,
    search: Arc<InventorySearchClient>,
    booking: Arc<BookingClient>,
    memory: Arc<dyn CustomerMemory>,
    classifier: Arc<dyn IntentClassifier>,
    resolver: SelectionResolver,
    settings: WorkflowSettings,
}

impl WorkflowController {
    pub fn new(dependencies: WorkflowDependencies, settings: WorkflowSettings) -> Self {
        Self {
            engine: dependencies.engine,
            search: dependencies.search,
            booking: dependencies.booking,
            memory: dependencies.memory,
            classifier: dependencies.classifier,
            resolver: SelectionResolver::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Starts a run with the customer's opening message.
    pub async fn start(
        &self,
        session: &mut SessionState,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, WorkflowError> {
        if !session.messages().is_empty() {
            return Err(WorkflowError::InvalidTransition(ValidationError::invalid_format(
                "session",
                "run already started",
            )));
        }
        session.push_message(Message::user(message));
        self.run(session, cancel).await
    }

    /// Resumes a run with a customer reply.
    ///
    /// While options are presented, the reply decides the branch: book,
    /// search again, or re-interpret the request.
    pub async fn reply(
        &self,
        session: &mut SessionState,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, WorkflowError> {
        if session.is_completed() {
            return Err(WorkflowError::AlreadyCompleted);
        }
        if let Some(step) = session.aborted_at() {
            return Err(WorkflowError::Aborted { step });
        }
        if session.turns() >= self.settings.max_turns {
            tracing::warn!(
                session_id = %session.id(),
                limit = self.settings.max_turns,
                "Turn limit reached"
            );
            session.abort();
            return Err(WorkflowError::TurnLimitExceeded {
                limit: self.settings.max_turns,
            });
        }

        session.record_reply(message);

        if session.current_step() == WorkflowStep::PresentOptions {
            let intent = self.classifier.classify(message);
            tracing::info!(session_id = %session.id(), intent = ?intent, "Customer replied to options");
            session.advance(intent.next_step())?;
        }

        self.run(session, cancel).await
    }

    /// Executes steps until the run awaits a reply, completes or fails.
    async fn run(
        &self,
        session: &mut SessionState,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, WorkflowError> {
        loop {
            let step = session.current_step();

            if step == WorkflowStep::Completed {
                return match &session.confirmation {
                    Some(confirmation) => Ok(RunOutcome::Completed {
                        confirmation: confirmation.clone(),
                    }),
                    None => Err(WorkflowError::AlreadyCompleted),
                };
            }

            if cancel.is_cancelled() {
                tracing::info!(session_id = %session.id(), step = %step, "Run cancelled");
                session.abort();
                return Err(WorkflowError::Cancelled { step });
            }

            tracing::info!(
                session_id = %session.id(),
                customer_id = %session.customer_id(),
                step = %step,
                "Running step"
            );

            let result = match timeout(self.settings.step_timeout, self.execute(step, session, cancel)).await {
                Ok(result) => result,
                Err(_) => Err(TravelError::timeout(step.as_str(), self.settings.step_timeout)),
            };

            match result {
                Ok(StepResult::Advance(next)) => session.advance(next)?,
                Ok(StepResult::Await(reply)) => return Ok(RunOutcome::AwaitingReply { reply }),
                Err(TravelError::Cancelled) => {
                    session.abort();
                    return Err(WorkflowError::Cancelled { step });
                }
                Err(source) => {
                    tracing::error!(
                        session_id = %session.id(),
                        step = %step,
                        error = %source,
                        "Step failed, aborting run"
                    );
                    session.abort();
                    return Err(WorkflowError::step_failed(step, source));
                }
            }
        }
    }

    async fn execute(
        &self,
        step: WorkflowStep,
        session: &mut SessionState,
        cancel: &CancellationToken,
    ) -> Result<StepResult, TravelError> {
        match step {
            WorkflowStep::UnderstandRequest => self.understand_request(session).await,
            WorkflowStep::RetrieveMemory => self.retrieve_memory(session).await,
            WorkflowStep::SearchOptions => self.search_options(session, cancel).await,
            WorkflowStep::PresentOptions => self.present_options(session).await,
            WorkflowStep::ProcessBooking => self.process_booking(session).await,
            WorkflowStep::SendConfirmation => self.send_confirmation(session).await,
            WorkflowStep::Completed => Ok(StepResult::Advance(WorkflowStep::Completed)),
        }
    }

    async fn understand_request(&self, session: &mut SessionState) -> Result<StepResult, TravelError> {
        let (text, calls) = match self.engine.interpret_or_respond(session).await? {
            ModelReply::Text(text) => {
                session.push_message(Message::assistant(text.clone()));
                return Ok(StepResult::Await(text));
            }
            ModelReply::Tools { text, calls } => (text, calls),
        };

        let params = search_params_from_tool_calls(&calls)
            .map_err(|e| TravelError::malformed("language_model", e.to_string()))?;

        let mut replies = Vec::new();
        if !text.is_empty() {
            replies.push(text);
        }
        for call in calls.iter().filter(|c| c.tool() == Some(TravelTool::CreateItinerary)) {
            let itinerary = ItineraryRequest::from_tool_call(call)
                .map_err(|e| TravelError::malformed("language_model", e.to_string()))?;
            replies.push(self.engine.create_itinerary(session, &itinerary).await?);
        }
        for reply in &replies {
            session.push_message(Message::assistant(reply.clone()));
        }

        if params.is_empty() {
            let reply = if replies.is_empty() {
                "Could you tell me more about where and when you'd like to travel?".to_string()
            } else {
                replies.join("\n\n")
            };
            if replies.is_empty() {
                session.push_message(Message::assistant(reply.clone()));
            }
            return Ok(StepResult::Await(reply));
        }

        tracing::debug!(
            session_id = %session.id(),
            categories = ?params.requested_categories(),
            "Search parameters extracted"
        );
        session.search_params.merge(params);
        Ok(StepResult::Advance(WorkflowStep::RetrieveMemory))
    }

    async fn retrieve_memory(&self, session: &mut SessionState) -> Result<StepResult, TravelError> {
        let profile = self.memory.recall(session.customer_id()).await?;
        session.customer_profile = Some(profile);
        Ok(StepResult::Advance(WorkflowStep::SearchOptions))
    }

    async fn search_options(
        &self,
        session: &mut SessionState,
        cancel: &CancellationToken,
    ) -> Result<StepResult, TravelError> {
        let outcome = self.search.search(&session.search_params, cancel).await?;
        if outcome.is_partial() {
            tracing::warn!(
                session_id = %session.id(),
                failed = ?outcome.failures.iter().map(|f| f.category).collect::<Vec<_>>(),
                "Presenting partial search results"
            );
        }
        session.search_results = outcome.results;
        session.search_failures = outcome.failures;
        Ok(StepResult::Advance(WorkflowStep::PresentOptions))
    }

    async fn present_options(&self, session: &mut SessionState) -> Result<StepResult, TravelError> {
        let text = self
            .engine
            .present_offers(
                session,
                &session.search_results,
                &session.search_failures,
                session.customer_profile.as_ref(),
            )
            .await?;
        session.push_message(Message::assistant(text.clone()));
        Ok(StepResult::Await(text))
    }

    async fn process_booking(&self, session: &mut SessionState) -> Result<StepResult, TravelError> {
        let selection = self.selection(session)?;

        let confirmation = self.booking.process_booking(&selection).await?;

        session.selected_options = selection.offers().to_vec();
        session.confirmation = Some(confirmation);
        session.booking_confirmed = true;
        Ok(StepResult::Advance(WorkflowStep::SendConfirmation))
    }

    async fn send_confirmation(&self, session: &mut SessionState) -> Result<StepResult, TravelError> {
        let confirmation = session
            .confirmation
            .clone()
            .ok_or_else(|| ValidationError::missing_parameter("confirmation"))?;
        let recipient = session
            .customer_email()
            .ok_or_else(|| ValidationError::missing_parameter("customer_email"))?
            .to_string();
        let token = session
            .payment_token()
            .ok_or_else(|| ValidationError::missing_parameter("payment_token"))?;
        let selection =
            BookingSelection::new(session.customer_id().clone(), session.selected_options.clone(), token)?;

        let status = self
            .booking
            .send_confirmation_email(&recipient, &selection, &confirmation)
            .await?;
        if !status.accepted {
            return Err(TravelError::remote(
                "email",
                format!("provider answered with status {}", status.status_code),
            ));
        }

        self.memory
            .remember(
                session.customer_id(),
                ProfileUpdate::latest_booking(BookingRecord::from_booking(&selection, &confirmation)),
            )
            .await?;

        session.push_message(Message::assistant(format!(
            "Your booking is confirmed! Your confirmation number is {}. A confirmation email is on its way to {}.",
            confirmation.confirmation_number, recipient
        )));
        Ok(StepResult::Advance(WorkflowStep::Completed))
    }

    /// Builds the booking selection from the latest reply.
    ///
    /// The payment token and email are checked before any offer is resolved,
    /// so a booking never starts without the means to pay and notify.
    fn selection(&self, session: &SessionState) -> Result<BookingSelection, TravelError> {
        let token = session
            .payment_token()
            .ok_or_else(|| ValidationError::missing_parameter("payment_token"))?;
        let email = session
            .customer_email()
            .ok_or_else(|| ValidationError::missing_parameter("customer_email"))?;
        let reply = session.latest_customer_message().unwrap_or_default();

        let offers = self.resolver.resolve(reply, &session.search_results)?;
        Ok(BookingSelection::new(session.customer_id().clone(), offers, token)?.with_email(email))
    }
}

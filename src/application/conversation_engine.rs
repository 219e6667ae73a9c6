//! Conversation Engine - the only component that talks to the language model.
//!
//! Every call sends the bounded conversation window, the travel-agent system
//! prompt and a per-call timeout. Empty completions are malformed responses.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use crate::domain::conversation::{
    presentation_prompt, system_prompt, travel_tools, BoundedHistory, ConversationHistory,
    ItineraryRequest, Message, ToolCall, ToolDefinition,
};
use crate::domain::travel::{CategoryFailure, CustomerProfile, SearchResults, TravelError};
use crate::domain::workflow::SessionState;
use crate::ports::{AIProvider, CompletionRequest, CompletionResponse, RequestMetadata};

const SERVICE: &str = "language_model";

/// What the model made of the latest customer message.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// A direct answer, usually a clarifying question.
    Text(String),
    /// Tool invocations, with any text the model sent alongside.
    Tools { text: String, calls: Vec<ToolCall> },
}

/// Tunables for [`ConversationEngine`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub max_tokens: u32,
    /// Deadline for a single completion.
    pub timeout: Duration,
    /// Messages kept in the window sent to the model.
    pub history_limit: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            timeout: Duration::from_secs(120),
            history_limit: 40,
        }
    }
}

/// Wraps the language model behind intent interpretation, offer
/// presentation and itinerary generation.
pub struct ConversationEngine {
    provider: Arc<dyn AIProvider>,
    tools: Vec<ToolDefinition>,
    system_prompt: String,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(provider: Arc<dyn AIProvider>, settings: EngineSettings) -> Self {
        let tools = travel_tools();
        let system_prompt = system_prompt(&tools);
        Self {
            provider,
            tools,
            system_prompt,
            settings,
        }
    }

    /// Interprets the conversation so far.
    ///
    /// Returns either the model's text reply or the tools it wants invoked.
    pub async fn interpret_or_respond(&self, session: &SessionState) -> Result<ModelReply, TravelError> {
        let request = self
            .request(session, self.window(session))
            .with_tools(self.tools.clone());

        let response = self.complete(request).await?;
        if response.has_tool_calls() {
            return Ok(ModelReply::Tools {
                text: response.content.trim().to_string(),
                calls: response.tool_calls,
            });
        }
        Ok(ModelReply::Text(non_empty(response.content)?))
    }

    /// Renders search results as a personalized summary for the customer.
    pub async fn present_offers(
        &self,
        session: &SessionState,
        results: &SearchResults,
        failures: &[CategoryFailure],
        profile: Option<&CustomerProfile>,
    ) -> Result<String, TravelError> {
        let unavailable: Vec<String> = failures
            .iter()
            .map(|f| f.category.plural().to_string())
            .collect();
        let prompt = presentation_prompt(
            &render_offers(results),
            &render_preferences(profile),
            &unavailable,
        );

        let mut window = self.window(session);
        window.push(Message::user(prompt));

        let response = self.complete(self.request(session, window)).await?;
        non_empty(response.content)
    }

    /// Generates a day-by-day itinerary.
    pub async fn create_itinerary(
        &self,
        session: &SessionState,
        itinerary: &ItineraryRequest,
    ) -> Result<String, TravelError> {
        let interests = if itinerary.interests.is_empty() {
            "general sightseeing".to_string()
        } else {
            itinerary.interests.join(", ")
        };
        let prompt = format!(
            "Create a {}-day itinerary for {}.\nInterests: {}\nInclude: activities, restaurants, timing, estimated costs.",
            itinerary.days, itinerary.destination, interests
        );

        let request = self.request(session, vec![Message::user(prompt)]);
        let response = self.complete(request).await?;
        non_empty(response.content)
    }

    /// The bounded window of the session transcript.
    fn window(&self, session: &SessionState) -> Vec<Message> {
        let mut history = BoundedHistory::new(self.settings.history_limit);
        for message in session.messages() {
            history.push(message.clone());
        }
        history.messages()
    }

    fn request(&self, session: &SessionState, messages: Vec<Message>) -> CompletionRequest {
        let metadata = RequestMetadata::new(
            session.id(),
            session.customer_id().clone(),
            Uuid::new_v4().to_string(),
        );
        CompletionRequest::new(metadata)
            .with_system_prompt(self.system_prompt.clone())
            .with_messages(messages)
            .with_max_tokens(self.settings.max_tokens)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, TravelError> {
        tracing::debug!(
            session_id = %request.metadata.session_id,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Requesting completion"
        );

        match timeout(self.settings.timeout, self.provider.complete(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(TravelError::timeout(SERVICE, self.settings.timeout)),
        }
    }
}

fn non_empty(content: String) -> Result<String, TravelError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(TravelError::malformed(SERVICE, "empty completion"));
    }
    Ok(trimmed.to_string())
}

/// Numbered offers per category, in presentation order.
fn render_offers(results: &SearchResults) -> String {
    if results.is_empty() {
        return "No offers were found.".to_string();
    }
    let mut rendered = String::new();
    for (category, offers) in results.iter() {
        rendered.push_str(&format!("{}:\n", category.plural()));
        if offers.is_empty() {
            rendered.push_str("  (none available)\n");
        }
        for (i, offer) in offers.iter().enumerate() {
            rendered.push_str(&format!("  {}. {}\n", i + 1, offer.summary()));
        }
    }
    rendered
}

fn render_preferences(profile: Option<&CustomerProfile>) -> String {
    let Some(profile) = profile.filter(|p| !p.is_empty()) else {
        return String::new();
    };

    let mut rendered = String::new();
    if !profile.preferences.is_null() {
        rendered.push_str(&format!("Preferences: {}\n", profile.preferences));
    }
    if let Some(booking) = &profile.latest_booking {
        let titles: Vec<&str> = booking.offers.iter().map(|o| o.title.as_str()).collect();
        rendered.push_str(&format!(
            "Previous booking {}: {} ({})\n",
            booking.confirmation_number,
            titles.join(", "),
            booking.total
        ));
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::inventory::sample_offers;
    use crate::domain::foundation::CustomerId;
    use crate::domain::travel::OfferCategory;
    use crate::ports::AIError;
    use serde_json::json;

    fn session(text: &str) -> SessionState {
        let mut session = SessionState::new(CustomerId::new("cust-1").unwrap());
        session.push_message(Message::user(text));
        session
    }

    fn engine(provider: MockAIProvider) -> ConversationEngine {
        ConversationEngine::new(Arc::new(provider), EngineSettings::default())
    }

    #[tokio::test]
    async fn text_reply_is_returned_trimmed() {
        let provider = MockAIProvider::new().with_response("  When would you like to travel?  ");
        let reply = engine(provider.clone())
            .interpret_or_respond(&session("Tokyo please"))
            .await
            .unwrap();

        assert_eq!(reply, ModelReply::Text("When would you like to travel?".to_string()));
        let calls = provider.get_calls();
        assert_eq!(calls[0].tools.len(), 4);
        assert!(calls[0].system_prompt.as_deref().unwrap().contains("travel agent"));
    }

    #[tokio::test]
    async fn tool_calls_are_surfaced() {
        let provider = MockAIProvider::new().with_tool_call(
            "search_hotels",
            json!({"city": "Tokyo", "check_in": "2026-10-23", "check_out": "2026-10-26"}),
        );
        let reply = engine(provider)
            .interpret_or_respond(&session("hotel in Tokyo"))
            .await
            .unwrap();

        match reply {
            ModelReply::Tools { calls, .. } => assert_eq!(calls[0].name, "search_hotels"),
            other => panic!("expected tool calls, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_completion_is_malformed() {
        let provider = MockAIProvider::new().with_response("   ");
        let err = engine(provider)
            .interpret_or_respond(&session("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, TravelError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn provider_errors_become_travel_errors() {
        let provider = MockAIProvider::new().with_error(AIError::unavailable("overloaded"));
        let err = engine(provider)
            .interpret_or_respond(&session("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, TravelError::RemoteService { .. }));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = MockAIProvider::new().with_delay(Duration::from_millis(200));
        let settings = EngineSettings {
            timeout: Duration::from_millis(20),
            ..EngineSettings::default()
        };
        let engine = ConversationEngine::new(Arc::new(provider), settings);

        let err = engine.interpret_or_respond(&session("hi")).await.unwrap_err();
        assert!(matches!(err, TravelError::Timeout { .. }));
    }

    #[tokio::test]
    async fn presentation_prompt_includes_offers_and_gaps() {
        let provider = MockAIProvider::new().with_response("Here are your options");
        let mut results = SearchResults::new();
        results.insert(OfferCategory::Flight, sample_offers(OfferCategory::Flight, 2));
        let failures = vec![CategoryFailure::new(
            OfferCategory::Hotel,
            TravelError::remote("hotels", "503"),
        )];

        let text = engine(provider.clone())
            .present_offers(&session("Tokyo"), &results, &failures, None)
            .await
            .unwrap();

        assert_eq!(text, "Here are your options");
        let calls = provider.get_calls();
        let prompt = &calls[0].messages.last().unwrap().content;
        assert!(prompt.contains("Flights:"));
        assert!(prompt.contains("1. flight option 1 (FL-1)"));
        assert!(prompt.contains("could not be searched right now: Hotels"));
        assert!(calls[0].tools.is_empty());
    }

    #[tokio::test]
    async fn itinerary_prompt_names_destination_and_days() {
        let provider = MockAIProvider::new().with_response("Day 1: Asakusa");
        let itinerary = ItineraryRequest {
            destination: "Tokyo".to_string(),
            days: 3,
            interests: vec!["food".to_string()],
        };

        let text = engine(provider.clone())
            .create_itinerary(&session("plan my trip"), &itinerary)
            .await
            .unwrap();

        assert_eq!(text, "Day 1: Asakusa");
        let prompt = &provider.get_calls()[0].messages[0].content;
        assert!(prompt.starts_with("Create a 3-day itinerary for Tokyo."));
        assert!(prompt.contains("Interests: food"));
    }

    #[test]
    fn window_is_bounded() {
        let provider = MockAIProvider::new();
        let settings = EngineSettings {
            history_limit: 4,
            ..EngineSettings::default()
        };
        let engine = ConversationEngine::new(Arc::new(provider), settings);
        let mut session = session("first");
        for i in 0..10 {
            session.push_message(Message::assistant(format!("a{}", i)));
            session.push_message(Message::user(format!("u{}", i)));
        }

        let window = engine.window(&session);
        assert!(window.len() <= 4);
        assert!(window[0].is_user());
    }
}

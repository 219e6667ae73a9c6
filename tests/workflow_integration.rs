//! Integration tests for the booking workflow.
//!
//! These tests drive full conversations through the workflow controller:
//! 1. The language model interprets the request into search parameters
//! 2. Inventory is searched concurrently per requested category
//! 3. The customer's reply decides between booking, revising and clarifying
//! 4. Booking charges once, confirms with the supplier and emails the customer
//!
//! Uses mock adapters to test the workflow without external dependencies.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use travel_agent::adapters::ai::MockAIProvider;
use travel_agent::adapters::email::MockNotifier;
use travel_agent::adapters::inventory::{sample_offers, MockInventoryProvider};
use travel_agent::adapters::ledger::InMemoryBookingLedger;
use travel_agent::adapters::memory::InMemoryCustomerMemory;
use travel_agent::adapters::stripe::MockPaymentProvider;
use travel_agent::adapters::supplier::LocalSupplierGateway;
use travel_agent::application::{
    BookingClient, BookingSettings, ConversationEngine, EngineSettings, InventorySearchClient,
    RunOutcome, SearchPolicy, WorkflowController, WorkflowDependencies, WorkflowError,
    WorkflowSettings,
};
use travel_agent::domain::foundation::CustomerId;
use travel_agent::domain::travel::{CustomerProfile, OfferCategory};
use travel_agent::domain::workflow::{KeywordIntentClassifier, SessionState, WorkflowStep};
use travel_agent::ports::{CustomerMemory, InventoryError};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Mock adapters shared by every session a test runs.
struct TestAgency {
    ai: MockAIProvider,
    inventory: MockInventoryProvider,
    payments: MockPaymentProvider,
    suppliers: LocalSupplierGateway,
    notifier: MockNotifier,
    memory: InMemoryCustomerMemory,
    booking: Arc<BookingClient>,
    max_turns: u32,
}

impl TestAgency {
    fn new(ai: MockAIProvider) -> Self {
        Self::with_adapters(ai, MockInventoryProvider::with_sample_offers(), MockPaymentProvider::new())
    }

    fn with_adapters(
        ai: MockAIProvider,
        inventory: MockInventoryProvider,
        payments: MockPaymentProvider,
    ) -> Self {
        let suppliers = LocalSupplierGateway::new();
        let notifier = MockNotifier::new();
        let booking = Arc::new(BookingClient::new(
            Arc::new(payments.clone()),
            Arc::new(suppliers.clone()),
            Arc::new(notifier.clone()),
            Arc::new(InMemoryBookingLedger::new()),
            BookingSettings::default(),
        ));
        Self {
            ai,
            inventory,
            payments,
            suppliers,
            notifier,
            memory: InMemoryCustomerMemory::new(),
            booking,
            max_turns: 10,
        }
    }

    fn controller(&self) -> WorkflowController {
        WorkflowController::new(
            WorkflowDependencies {
                engine: Arc::new(ConversationEngine::new(
                    Arc::new(self.ai.clone()),
                    EngineSettings::default(),
                )),
                search: Arc::new(InventorySearchClient::new(
                    Arc::new(self.inventory.clone()),
                    SearchPolicy {
                        call_timeout: Duration::from_secs(1),
                        max_retries: 1,
                        initial_backoff: Duration::from_millis(1),
                    },
                )),
                booking: self.booking.clone(),
                memory: Arc::new(self.memory.clone()),
                classifier: Arc::new(KeywordIntentClassifier::new()),
            },
            WorkflowSettings {
                max_turns: self.max_turns,
                step_timeout: Duration::from_secs(5),
            },
        )
    }
}

fn customer() -> CustomerId {
    CustomerId::new("cust-42").unwrap()
}

fn session() -> SessionState {
    SessionState::new(customer())
        .with_email("traveller@example.com")
        .with_payment_token("tok_visa")
}

fn tokyo_flight() -> serde_json::Value {
    json!({
        "origin": "SFO",
        "destination": "NRT",
        "departure_date": "2026-10-23",
        "adults": 1
    })
}

fn tokyo_hotel() -> serde_json::Value {
    json!({
        "city": "Tokyo",
        "check_in": "2026-10-23",
        "check_out": "2026-10-30",
        "guests": 1
    })
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn flight_request_searches_flights_only() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("I found three flights to Tokyo.");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let mut session = session();

    let outcome = controller
        .start(&mut session, "I want a flight to Tokyo next week", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::AwaitingReply {
            reply: "I found three flights to Tokyo.".to_string()
        }
    );
    assert_eq!(agency.inventory.call_count(OfferCategory::Flight), 1);
    assert_eq!(agency.inventory.call_count(OfferCategory::Hotel), 0);
    assert_eq!(agency.inventory.call_count(OfferCategory::Activity), 0);
    assert_eq!(
        session.search_results.categories().collect::<Vec<_>>(),
        vec![OfferCategory::Flight]
    );
    assert!(!session.search_results.get(OfferCategory::Flight).is_empty());
}

#[tokio::test]
async fn empty_inventory_is_presented_without_error() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Sorry, no flights matched.");
    let agency = TestAgency::with_adapters(ai, MockInventoryProvider::new(), MockPaymentProvider::new());
    let controller = agency.controller();
    let mut session = session();

    let outcome = controller
        .start(&mut session, "A flight to Tokyo", &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::AwaitingReply { .. }));
    assert_eq!(session.current_step(), WorkflowStep::PresentOptions);
    assert!(session.search_results.get(OfferCategory::Flight).is_empty());
}

#[tokio::test]
async fn booking_the_first_option_completes_the_trip() {
    let ai = MockAIProvider::new()
        .with_tool_calls(vec![
            ("search_flights".to_string(), tokyo_flight()),
            ("search_hotels".to_string(), tokyo_hotel()),
        ])
        .with_response("Here are flights and hotels in Tokyo.");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let mut session = session();
    let cancel = CancellationToken::new();

    controller
        .start(&mut session, "Flight and hotel in Tokyo next week", &cancel)
        .await
        .unwrap();
    let outcome = controller
        .reply(&mut session, "Please book the first option", &cancel)
        .await
        .unwrap();

    let RunOutcome::Completed { confirmation } = outcome else {
        panic!("expected a completed booking, got {:?}", outcome);
    };
    let ids: Vec<&str> = session.selected_options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["FL-1", "HT-1"]);
    // FL-1 is 500.00 and HT-1 is 300.00
    assert_eq!(confirmation.total.amount_cents(), 80_000);
    assert!(session.booking_confirmed);
    assert_eq!(session.confirmation_number(), Some(confirmation.confirmation_number.as_str()));

    assert_eq!(agency.payments.charge_count(), 1);
    let sent = agency.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "traveller@example.com");
    assert!(sent[0].html_body.contains(&confirmation.confirmation_number));

    let profile = agency.memory.recall(&customer()).await.unwrap();
    assert_eq!(
        profile.latest_booking.map(|b| b.confirmation_number),
        Some(confirmation.confirmation_number)
    );
}

#[tokio::test]
async fn book_wins_over_revision_keywords() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Flights to Tokyo.");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let mut session = session();
    let cancel = CancellationToken::new();

    controller.start(&mut session, "Tokyo", &cancel).await.unwrap();
    let outcome = controller
        .reply(&mut session, "No other options needed, confirm the 3rd", &cancel)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Completed { .. }));
    assert_eq!(session.selected_options[0].id, "FL-3");
    assert_eq!(agency.inventory.call_count(OfferCategory::Flight), 1);
}

#[tokio::test]
async fn revision_reply_searches_again_without_charging() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Flights to Tokyo.")
        .with_response("Here is another look at the flights.");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let mut session = session();
    let cancel = CancellationToken::new();

    controller.start(&mut session, "Tokyo", &cancel).await.unwrap();
    controller
        .reply(&mut session, "Can I see other options?", &cancel)
        .await
        .unwrap();

    assert_eq!(session.current_step(), WorkflowStep::PresentOptions);
    assert_eq!(agency.inventory.call_count(OfferCategory::Flight), 2);
    assert_eq!(agency.payments.call_count(), 0);
}

#[tokio::test]
async fn declined_payment_leaves_memory_untouched() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Flights to Tokyo.");
    let agency = TestAgency::with_adapters(
        ai,
        MockInventoryProvider::with_sample_offers(),
        MockPaymentProvider::declining("Your card was declined."),
    );
    let controller = agency.controller();
    let mut session = session();
    let cancel = CancellationToken::new();

    controller.start(&mut session, "Tokyo", &cancel).await.unwrap();
    let err = controller
        .reply(&mut session, "book the first one", &cancel)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "PAYMENT_DECLINED");
    assert_eq!(err.step(), Some(WorkflowStep::ProcessBooking));
    assert!(err.user_message().contains("declined"));
    assert!(!session.booking_confirmed);
    assert!(agency.memory.is_empty().await);
    assert!(agency.notifier.sent().is_empty());
    assert_eq!(agency.suppliers.call_count(), 0);
}

#[tokio::test]
async fn identical_bookings_charge_once() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Flights to Tokyo.")
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Flights to Tokyo again.");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let cancel = CancellationToken::new();

    let mut first = session();
    controller.start(&mut first, "Tokyo", &cancel).await.unwrap();
    controller.reply(&mut first, "book FL-2", &cancel).await.unwrap();

    let mut second = session();
    controller.start(&mut second, "Tokyo", &cancel).await.unwrap();
    controller.reply(&mut second, "book FL-2", &cancel).await.unwrap();

    assert_eq!(agency.payments.charge_count(), 1);
    assert_eq!(agency.suppliers.confirmation_count(), 1);
    assert_eq!(first.confirmation_number(), second.confirmation_number());
}

#[tokio::test]
async fn failed_category_degrades_to_partial_results() {
    let ai = MockAIProvider::new()
        .with_tool_calls(vec![
            ("search_flights".to_string(), tokyo_flight()),
            ("search_hotels".to_string(), tokyo_hotel()),
        ])
        .with_response("Flights are below; hotels are unavailable right now.");
    let inventory = MockInventoryProvider::new()
        .with_offers(OfferCategory::Flight, sample_offers(OfferCategory::Flight, 2))
        .with_failure(OfferCategory::Hotel, InventoryError::remote("booking.com", "503"));
    let agency = TestAgency::with_adapters(ai, inventory, MockPaymentProvider::new());
    let controller = agency.controller();
    let mut session = session();

    controller
        .start(&mut session, "Tokyo trip", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(session.current_step(), WorkflowStep::PresentOptions);
    assert_eq!(session.search_results.get(OfferCategory::Flight).len(), 2);
    assert_eq!(session.search_failures.len(), 1);
    assert_eq!(session.search_failures[0].category, OfferCategory::Hotel);

    let calls = agency.ai.get_calls();
    let presentation = &calls.last().unwrap().messages.last().unwrap().content;
    assert!(presentation.contains("could not be searched right now: hotels"));
}

#[tokio::test]
async fn returning_customer_preferences_reach_the_presentation() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Aisle seats, as usual.");
    let agency = TestAgency::new(ai);
    let mut profile = CustomerProfile::empty(customer());
    profile.preferences = json!({"seat": "aisle"});
    agency.memory.insert(profile).await;

    let controller = agency.controller();
    let mut session = session();
    controller
        .start(&mut session, "Tokyo", &CancellationToken::new())
        .await
        .unwrap();

    let calls = agency.ai.get_calls();
    let presentation = &calls.last().unwrap().messages.last().unwrap().content;
    assert!(presentation.contains("aisle"));
}

#[tokio::test]
async fn endless_clarification_hits_the_turn_limit() {
    let mut agency = TestAgency::new(MockAIProvider::new());
    agency.max_turns = 3;
    let controller = agency.controller();
    let mut session = session();
    let cancel = CancellationToken::new();

    controller.start(&mut session, "Somewhere warm", &cancel).await.unwrap();
    for reply in ["Maybe", "Not sure", "Hmm"] {
        controller.reply(&mut session, reply, &cancel).await.unwrap();
    }
    let err = controller.reply(&mut session, "Still not sure", &cancel).await.unwrap_err();

    assert_eq!(err, WorkflowError::TurnLimitExceeded { limit: 3 });
    assert_eq!(agency.ai.call_count(), 4);
}

#[tokio::test]
async fn cancellation_stops_the_run_between_steps() {
    let ai = MockAIProvider::new()
        .with_tool_call("search_flights", tokyo_flight())
        .with_response("Flights to Tokyo.");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let mut session = session();
    let cancel = CancellationToken::new();

    controller.start(&mut session, "Tokyo", &cancel).await.unwrap();
    cancel.cancel();
    let err = controller.reply(&mut session, "book", &cancel).await.unwrap_err();

    assert_eq!(
        err,
        WorkflowError::Cancelled {
            step: WorkflowStep::ProcessBooking
        }
    );
    assert_eq!(agency.payments.call_count(), 0);
}

#[tokio::test]
async fn itinerary_request_is_answered_in_conversation() {
    let ai = MockAIProvider::new()
        .with_tool_call(
            "create_itinerary",
            json!({"destination": "Kyoto", "days": 3, "interests": ["temples", "food"]}),
        )
        .with_response("Day 1: Fushimi Inari at dawn...");
    let agency = TestAgency::new(ai);
    let controller = agency.controller();
    let mut session = session();

    let outcome = controller
        .start(&mut session, "Plan three days in Kyoto", &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::AwaitingReply {
            reply: "Day 1: Fushimi Inari at dawn...".to_string()
        }
    );
    assert_eq!(session.current_step(), WorkflowStep::UnderstandRequest);
    let prompt = &agency.ai.get_calls()[1].messages[0].content;
    assert!(prompt.starts_with("Create a 3-day itinerary for Kyoto."));
    assert!(prompt.contains("Interests: temples, food"));
}

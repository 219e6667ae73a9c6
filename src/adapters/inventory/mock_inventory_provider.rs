//! Mock inventory provider for testing.
//!
//! Each category has a standing result plus an optional queue of one-shot
//! results, consumed before the standing one. Queued results make retry
//! behaviour testable.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::sleep;

use crate::domain::travel::{
    ActivityQuery, FlightQuery, HotelQuery, Money, Offer, OfferCategory,
};
use crate::ports::{InventoryError, InventoryProvider};

type SearchResult = Result<Vec<Offer>, InventoryError>;

/// Mock inventory provider for testing.
#[derive(Clone, Default)]
pub struct MockInventoryProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    standing: HashMap<OfferCategory, SearchResult>,
    queued: HashMap<OfferCategory, VecDeque<SearchResult>>,
    delays: HashMap<OfferCategory, Duration>,
    calls: HashMap<OfferCategory, usize>,
}

impl MockInventoryProvider {
    /// Creates a provider that returns no offers for any category.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with three sample offers in every category.
    pub fn with_sample_offers() -> Self {
        OfferCategory::ALL
            .into_iter()
            .fold(Self::new(), |mock, category| {
                mock.with_offers(category, sample_offers(category, 3))
            })
    }

    /// Sets the standing offers for a category.
    pub fn with_offers(self, category: OfferCategory, offers: Vec<Offer>) -> Self {
        self.inner.lock().unwrap().standing.insert(category, Ok(offers));
        self
    }

    /// Makes every search in a category fail.
    pub fn with_failure(self, category: OfferCategory, error: InventoryError) -> Self {
        self.inner.lock().unwrap().standing.insert(category, Err(error));
        self
    }

    /// Queues a one-shot result for a category.
    pub fn push_result(self, category: OfferCategory, result: SearchResult) -> Self {
        self.inner
            .lock()
            .unwrap()
            .queued
            .entry(category)
            .or_default()
            .push_back(result);
        self
    }

    /// Delays every search in a category.
    pub fn with_delay(self, category: OfferCategory, delay: Duration) -> Self {
        self.inner.lock().unwrap().delays.insert(category, delay);
        self
    }

    /// Number of searches issued for a category.
    pub fn call_count(&self, category: OfferCategory) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    async fn respond(&self, category: OfferCategory) -> SearchResult {
        let (delay, result) = {
            let mut state = self.inner.lock().unwrap();
            *state.calls.entry(category).or_insert(0) += 1;

            let queued = state.queued.get_mut(&category).and_then(VecDeque::pop_front);
            let result = queued.unwrap_or_else(|| {
                state
                    .standing
                    .get(&category)
                    .cloned()
                    .unwrap_or_else(|| Ok(Vec::new()))
            });
            (state.delays.get(&category).copied(), result)
        };

        if let Some(delay) = delay {
            sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl InventoryProvider for MockInventoryProvider {
    async fn search_flights(&self, _query: &FlightQuery) -> SearchResult {
        self.respond(OfferCategory::Flight).await
    }

    async fn search_hotels(&self, _query: &HotelQuery) -> SearchResult {
        self.respond(OfferCategory::Hotel).await
    }

    async fn search_activities(&self, _query: &ActivityQuery) -> SearchResult {
        self.respond(OfferCategory::Activity).await
    }
}

/// Builds `count` deterministic USD offers for a category.
///
/// Ids follow the pattern `FL-1`, `HT-2`, `AC-3`; prices grow by 100 USD
/// from a per-category base.
pub fn sample_offers(category: OfferCategory, count: usize) -> Vec<Offer> {
    let (prefix, base_cents, provider) = match category {
        OfferCategory::Flight => ("FL", 50_000, "amadeus"),
        OfferCategory::Hotel => ("HT", 30_000, "booking.com"),
        OfferCategory::Activity => ("AC", 5_000, "activities"),
    };

    (1..=count)
        .filter_map(|n| {
            let price = Money::new(base_cents + (n as i64 - 1) * 10_000, "USD").ok()?;
            Some(
                Offer::new(
                    format!("{}-{}", prefix, n),
                    category,
                    provider,
                    format!("{} option {}", category, n),
                    price,
                )
                .with_details(json!({ "rank": n })),
            )
        })
        .collect()
}

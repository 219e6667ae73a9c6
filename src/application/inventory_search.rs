//! Inventory Search Client - concurrent, fault-isolated category searches.
//!
//! Each requested category is searched concurrently. A category that fails
//! after its retries is reported as a [`CategoryFailure`] while the others
//! still return offers. Only when every requested category fails does the
//! search as a whole fail.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

use crate::domain::travel::{
    CategoryFailure, Offer, OfferCategory, SearchParams, SearchResults, TravelError,
};
use crate::ports::{InventoryError, InventoryProvider};

/// Timeout and retry policy for a single category search.
#[derive(Debug, Clone)]
pub struct SearchPolicy {
    pub call_timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles for each further retry.
    pub initial_backoff: Duration,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(15),
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

/// Offers found plus the categories that could not be searched.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: SearchResults,
    pub failures: Vec<CategoryFailure>,
}

impl SearchOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs category searches against an [`InventoryProvider`].
pub struct InventorySearchClient {
    provider: Arc<dyn InventoryProvider>,
    policy: SearchPolicy,
}

impl InventorySearchClient {
    pub fn new(provider: Arc<dyn InventoryProvider>, policy: SearchPolicy) -> Self {
        Self { provider, policy }
    }

    /// Searches every category present in `params`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `params` is empty or a query is invalid
    /// - `Cancelled` if `cancel` fires before any category completes
    /// - the first category's error when every requested category failed
    pub async fn search(
        &self,
        params: &SearchParams,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, TravelError> {
        params.validate()?;

        let flights = async {
            match &params.flights {
                Some(query) => Some(
                    self.search_category(OfferCategory::Flight, cancel, || {
                        self.provider.search_flights(query)
                    })
                    .await,
                ),
                None => None,
            }
        };
        let hotels = async {
            match &params.hotels {
                Some(query) => Some(
                    self.search_category(OfferCategory::Hotel, cancel, || {
                        self.provider.search_hotels(query)
                    })
                    .await,
                ),
                None => None,
            }
        };
        let activities = async {
            match &params.activities {
                Some(query) => Some(
                    self.search_category(OfferCategory::Activity, cancel, || {
                        self.provider.search_activities(query)
                    })
                    .await,
                ),
                None => None,
            }
        };

        let (flights, hotels, activities) = tokio::join!(flights, hotels, activities);

        let mut outcome = SearchOutcome::default();
        let categories = [
            (OfferCategory::Flight, flights),
            (OfferCategory::Hotel, hotels),
            (OfferCategory::Activity, activities),
        ];
        for (category, result) in categories {
            match result {
                Some(Ok(offers)) => outcome.results.insert(category, offers),
                Some(Err(error)) => outcome.failures.push(CategoryFailure::new(category, error)),
                None => {}
            }
        }

        if outcome.results.is_empty() {
            if let Some(first) = outcome.failures.first() {
                return Err(first.error.clone());
            }
        }

        tracing::info!(
            offers = outcome.results.total_offers(),
            failed_categories = outcome.failures.len(),
            "Search completed"
        );
        Ok(outcome)
    }

    /// One category with timeout and bounded retry.
    ///
    /// Cancellation is observed before each attempt and during backoff,
    /// never in the middle of a provider call.
    async fn search_category<F, Fut>(
        &self,
        category: OfferCategory,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<Vec<Offer>, TravelError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Vec<Offer>, InventoryError>>,
    {
        let service = format!("{}_search", category);
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(TravelError::Cancelled);
            }

            let error = match timeout(self.policy.call_timeout, call()).await {
                Ok(Ok(offers)) => {
                    tracing::debug!(category = %category, offers = offers.len(), attempt, "Category searched");
                    return Ok(offers);
                }
                Ok(Err(error)) => TravelError::from(error),
                Err(_) => TravelError::timeout(&service, self.policy.call_timeout),
            };

            if !error.is_retryable() || attempt >= self.policy.max_retries {
                tracing::warn!(category = %category, attempt, error = %error, "Category search failed");
                return Err(error);
            }

            let backoff = self.policy.initial_backoff * 2u32.saturating_pow(attempt);
            tracing::warn!(
                category = %category,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %error,
                "Category search failed, retrying"
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(TravelError::Cancelled),
                _ = sleep(backoff) => {}
            }
            attempt += 1;
        }
    }
}

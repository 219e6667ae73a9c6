//! Search parameters and aggregated search results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::ValidationError;

use super::{Offer, OfferCategory, TravelError};

const MAX_PARTY_SIZE: u32 = 9;

fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing_parameter(field));
    }
    Ok(())
}

fn require_party(field: &str, size: u32) -> Result<(), ValidationError> {
    if size == 0 || size > MAX_PARTY_SIZE {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_PARTY_SIZE as i64,
            size as i64,
        ));
    }
    Ok(())
}

/// Flight search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    /// IATA code of the departure airport or city.
    pub origin: String,
    /// IATA code of the arrival airport or city.
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_party")]
    pub adults: u32,
}

impl FlightQuery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("origin", &self.origin)?;
        require_text("destination", &self.destination)?;
        require_party("adults", self.adults)?;
        if let Some(ret) = self.return_date {
            if ret < self.departure_date {
                return Err(ValidationError::invalid_format(
                    "return_date",
                    "return date is before departure date",
                ));
            }
        }
        Ok(())
    }
}

/// Hotel search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelQuery {
    pub city: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default = "default_party")]
    pub guests: u32,
}

impl HotelQuery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("city", &self.city)?;
        require_party("guests", self.guests)?;
        if self.check_out <= self.check_in {
            return Err(ValidationError::invalid_format(
                "check_out",
                "check-out must be after check-in",
            ));
        }
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Activity search parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityQuery {
    pub location: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default = "default_party")]
    pub participants: u32,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl ActivityQuery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("location", &self.location)?;
        require_party("participants", self.participants)
    }
}

fn default_party() -> u32 {
    1
}

/// Structured parameters for one search pass.
///
/// A category is searched only when its query is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub flights: Option<FlightQuery>,
    #[serde(default)]
    pub hotels: Option<HotelQuery>,
    #[serde(default)]
    pub activities: Option<ActivityQuery>,
}

impl SearchParams {
    pub fn with_flights(mut self, query: FlightQuery) -> Self {
        self.flights = Some(query);
        self
    }

    pub fn with_hotels(mut self, query: HotelQuery) -> Self {
        self.hotels = Some(query);
        self
    }

    pub fn with_activities(mut self, query: ActivityQuery) -> Self {
        self.activities = Some(query);
        self
    }

    /// Categories that have parameters, in presentation order.
    pub fn requested_categories(&self) -> Vec<OfferCategory> {
        let mut categories = Vec::new();
        if self.flights.is_some() {
            categories.push(OfferCategory::Flight);
        }
        if self.hotels.is_some() {
            categories.push(OfferCategory::Hotel);
        }
        if self.activities.is_some() {
            categories.push(OfferCategory::Activity);
        }
        categories
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_none() && self.hotels.is_none() && self.activities.is_none()
    }

    /// Overlays the queries present in `other` onto this set.
    ///
    /// Used when the customer refines a search: categories they did not
    /// mention keep their previous parameters.
    pub fn merge(&mut self, other: SearchParams) {
        if other.flights.is_some() {
            self.flights = other.flights;
        }
        if other.hotels.is_some() {
            self.hotels = other.hotels;
        }
        if other.activities.is_some() {
            self.activities = other.activities;
        }
    }

    /// Validates every present query. An empty set is itself invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::missing_parameter("search_params"));
        }
        if let Some(q) = &self.flights {
            q.validate()?;
        }
        if let Some(q) = &self.hotels {
            q.validate()?;
        }
        if let Some(q) = &self.activities {
            q.validate()?;
        }
        Ok(())
    }
}

/// A category whose search failed while others may have succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFailure {
    pub category: OfferCategory,
    pub error: TravelError,
}

impl CategoryFailure {
    pub fn new(category: OfferCategory, error: TravelError) -> Self {
        Self { category, error }
    }
}

/// Offers grouped by category.
///
/// A category that was searched but found nothing is present with an
/// empty list, which is distinct from a category that was never searched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    offers: BTreeMap<OfferCategory, Vec<Offer>>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: OfferCategory, offers: Vec<Offer>) {
        self.offers.insert(category, offers);
    }

    /// Offers for a category; empty if the category was not searched.
    pub fn get(&self, category: OfferCategory) -> &[Offer] {
        self.offers.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_category(&self, category: OfferCategory) -> bool {
        self.offers.contains_key(&category)
    }

    /// Categories that were searched, in presentation order.
    pub fn categories(&self) -> impl Iterator<Item = OfferCategory> + '_ {
        self.offers.keys().copied()
    }

    pub fn total_offers(&self) -> usize {
        self.offers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_offers() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (OfferCategory, &[Offer])> {
        self.offers.iter().map(|(c, o)| (*c, o.as_slice()))
    }

    pub fn find_offer(&self, id: &str) -> Option<&Offer> {
        self.offers.values().flatten().find(|o| o.id == id)
    }
}

//! HTTP inventory provider - flight, hotel and activity search over REST.
//!
//! Flights use an Amadeus-style flight offers endpoint, hotels a
//! Booking.com-style search endpoint, activities an Amadeus-style activities
//! endpoint. Each response is normalized into [`Offer`] records.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::domain::travel::{
    ActivityQuery, FlightQuery, HotelQuery, Money, Offer, OfferCategory,
};
use crate::ports::{InventoryError, InventoryProvider};

/// Offers kept per category.
const MAX_OFFERS: usize = 5;

const FLIGHTS_PROVIDER: &str = "flights";
const HOTELS_PROVIDER: &str = "hotels";
const ACTIVITIES_PROVIDER: &str = "activities";

/// One configured search endpoint.
#[derive(Clone)]
pub struct Endpoint {
    base_url: String,
    api_key: SecretString,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
        }
    }
}

/// Configuration for [`HttpInventoryProvider`].
#[derive(Clone)]
pub struct HttpInventoryConfig {
    pub flights: Option<Endpoint>,
    pub hotels: Option<Endpoint>,
    pub activities: Option<Endpoint>,
    /// Currency assumed when a provider omits one.
    pub default_currency: String,
    /// Per-request timeout at the HTTP client level.
    pub timeout: Duration,
}

impl Default for HttpInventoryConfig {
    fn default() -> Self {
        Self {
            flights: None,
            hotels: None,
            activities: None,
            default_currency: "USD".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Inventory provider backed by REST search APIs.
pub struct HttpInventoryProvider {
    config: HttpInventoryConfig,
    client: Client,
}

impl HttpInventoryProvider {
    pub fn new(config: HttpInventoryConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    fn endpoint(
        endpoint: Option<&Endpoint>,
        category: OfferCategory,
    ) -> Result<&Endpoint, InventoryError> {
        endpoint.ok_or(InventoryError::NotConfigured { category })
    }

    async fn fetch<T: DeserializeOwned>(
        provider: &str,
        request: RequestBuilder,
    ) -> Result<T, InventoryError> {
        let response = request
            .send()
            .await
            .map_err(|e| InventoryError::remote(provider, e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(InventoryError::Unauthorized {
                    provider: provider.to_string(),
                })
            }
            429 => {
                return Err(InventoryError::RateLimited {
                    provider: provider.to_string(),
                })
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| InventoryError::remote(provider, e.to_string()))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(InventoryError::remote(
                provider,
                format!("status {}: {}", status.as_u16(), snippet),
            ));
        }

        serde_json::from_str(&body).map_err(|e| InventoryError::malformed(provider, e.to_string()))
    }

    fn normalize_flights(
        response: AmadeusFlightResponse,
        currency: &str,
    ) -> Result<Vec<Offer>, InventoryError> {
        response
            .data
            .into_iter()
            .take(MAX_OFFERS)
            .map(|flight| {
                let price = Money::parse_decimal(
                    &flight.price.total,
                    flight.price.currency.as_deref().unwrap_or(currency),
                )
                .map_err(|e| InventoryError::malformed(FLIGHTS_PROVIDER, e.to_string()))?;

                let segments: Vec<&FlightSegment> = flight
                    .itineraries
                    .iter()
                    .flat_map(|i| i.segments.iter())
                    .collect();
                let (first, last) = match (segments.first(), segments.last()) {
                    (Some(first), Some(last)) => (*first, *last),
                    _ => {
                        return Err(InventoryError::malformed(
                            FLIGHTS_PROVIDER,
                            format!("offer {} has no segments", flight.id),
                        ))
                    }
                };

                let carrier = flight
                    .validating_airline_codes
                    .first()
                    .cloned()
                    .unwrap_or_else(|| first.carrier_code.clone());
                let title = format!(
                    "{} {} to {}",
                    carrier, first.departure.iata_code, last.arrival.iata_code
                );
                let stops = flight
                    .itineraries
                    .first()
                    .map(|i| i.segments.len().saturating_sub(1))
                    .unwrap_or(0);

                Ok(Offer::new(
                    format!("FL-{}", flight.id),
                    OfferCategory::Flight,
                    "amadeus",
                    title,
                    price,
                )
                .with_description(format!("Departs {}, {} stop(s)", first.departure.at, stops))
                .with_details(json!({
                    "carrier": carrier,
                    "departure": first.departure.at,
                    "arrival": last.arrival.at,
                    "stops": stops,
                })))
            })
            .collect()
    }

    fn normalize_hotels(
        response: HotelSearchResponse,
        currency: &str,
        nights: i64,
    ) -> Result<Vec<Offer>, InventoryError> {
        response
            .result
            .into_iter()
            .take(MAX_OFFERS)
            .map(|hotel| {
                let price = Money::parse_decimal(
                    &format!("{:.2}", hotel.min_total_price),
                    hotel.currency_code.as_deref().unwrap_or(currency),
                )
                .map_err(|e| InventoryError::malformed(HOTELS_PROVIDER, e.to_string()))?;

                let mut description = format!("{} night(s)", nights);
                if let Some(score) = hotel.review_score {
                    description.push_str(&format!(", rated {:.1}", score));
                }

                Ok(Offer::new(
                    format!("HT-{}", id_string(&hotel.hotel_id)),
                    OfferCategory::Hotel,
                    "booking.com",
                    hotel.hotel_name,
                    price,
                )
                .with_description(description)
                .with_details(json!({
                    "address": hotel.address,
                    "review_score": hotel.review_score,
                    "nights": nights,
                })))
            })
            .collect()
    }

    fn normalize_activities(
        response: ActivitiesResponse,
        currency: &str,
    ) -> Result<Vec<Offer>, InventoryError> {
        response
            .data
            .into_iter()
            .filter_map(|activity| {
                let price = activity.price.as_ref()?;
                let amount = price.amount.clone()?;
                let currency_code = price.currency_code.clone();
                Some((activity, amount, currency_code))
            })
            .take(MAX_OFFERS)
            .map(|(activity, amount, currency_code)| {
                let price = Money::parse_decimal(&amount, currency_code.as_deref().unwrap_or(currency))
                    .map_err(|e| InventoryError::malformed(ACTIVITIES_PROVIDER, e.to_string()))?;

                Ok(Offer::new(
                    format!("AC-{}", activity.id),
                    OfferCategory::Activity,
                    "activities",
                    activity.name,
                    price,
                )
                .with_description(activity.short_description.unwrap_or_default())
                .with_details(json!({ "booking_link": activity.booking_link })))
            })
            .collect()
    }
}

/// Provider ids arrive as either numbers or strings.
fn id_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl InventoryProvider for HttpInventoryProvider {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<Offer>, InventoryError> {
        let endpoint = Self::endpoint(self.config.flights.as_ref(), OfferCategory::Flight)?;
        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.to_string()),
            ("adults", query.adults.to_string()),
            ("max", MAX_OFFERS.to_string()),
        ];
        if let Some(return_date) = query.return_date {
            params.push(("returnDate", return_date.to_string()));
        }

        tracing::debug!(origin = %query.origin, destination = %query.destination, "Searching flights");
        let request = self
            .client
            .get(format!("{}/v2/shopping/flight-offers", endpoint.base_url))
            .bearer_auth(endpoint.api_key.expose_secret())
            .query(&params);

        let response = Self::fetch(FLIGHTS_PROVIDER, request).await?;
        Self::normalize_flights(response, &self.config.default_currency)
    }

    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<Offer>, InventoryError> {
        let endpoint = Self::endpoint(self.config.hotels.as_ref(), OfferCategory::Hotel)?;
        let params = [
            ("city", query.city.clone()),
            ("checkin", query.check_in.to_string()),
            ("checkout", query.check_out.to_string()),
            ("guests", query.guests.to_string()),
        ];

        tracing::debug!(city = %query.city, "Searching hotels");
        let request = self
            .client
            .get(format!("{}/v1/hotels/search", endpoint.base_url))
            .bearer_auth(endpoint.api_key.expose_secret())
            .query(&params);

        let response = Self::fetch(HOTELS_PROVIDER, request).await?;
        Self::normalize_hotels(response, &self.config.default_currency, query.nights())
    }

    async fn search_activities(
        &self,
        query: &ActivityQuery,
    ) -> Result<Vec<Offer>, InventoryError> {
        let endpoint = Self::endpoint(self.config.activities.as_ref(), OfferCategory::Activity)?;
        let mut params = vec![
            ("location", query.location.clone()),
            ("participants", query.participants.to_string()),
        ];
        if let Some(date) = query.date {
            params.push(("date", date.to_string()));
        }
        if !query.interests.is_empty() {
            params.push(("interests", query.interests.join(",")));
        }

        tracing::debug!(location = %query.location, "Searching activities");
        let request = self
            .client
            .get(format!("{}/v1/shopping/activities", endpoint.base_url))
            .bearer_auth(endpoint.api_key.expose_secret())
            .query(&params);

        let response = Self::fetch(ACTIVITIES_PROVIDER, request).await?;
        Self::normalize_activities(response, &self.config.default_currency)
    }
}

// ----- Provider API Types -----

#[derive(Debug, Deserialize)]
struct AmadeusFlightResponse {
    #[serde(default)]
    data: Vec<FlightOffer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightOffer {
    id: String,
    price: FlightPrice,
    #[serde(default)]
    itineraries: Vec<FlightItinerary>,
    #[serde(default)]
    validating_airline_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FlightPrice {
    total: String,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlightItinerary {
    #[serde(default)]
    segments: Vec<FlightSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightSegment {
    departure: FlightEndpoint,
    arrival: FlightEndpoint,
    carrier_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightEndpoint {
    iata_code: String,
    at: String,
}

#[derive(Debug, Deserialize)]
struct HotelSearchResponse {
    #[serde(default)]
    result: Vec<HotelResult>,
}

#[derive(Debug, Deserialize)]
struct HotelResult {
    hotel_id: serde_json::Value,
    hotel_name: String,
    min_total_price: f64,
    currency_code: Option<String>,
    review_score: Option<f64>,
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ActivitiesResponse {
    #[serde(default)]
    data: Vec<ActivityResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityResult {
    id: String,
    name: String,
    short_description: Option<String>,
    price: Option<ActivityPrice>,
    booking_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityPrice {
    amount: Option<String>,
    currency_code: Option<String>,
}

//! Normalized search results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Inventory category an offer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferCategory {
    Flight,
    Hotel,
    Activity,
}

impl OfferCategory {
    /// All categories in presentation order.
    pub const ALL: [OfferCategory; 3] = [
        OfferCategory::Flight,
        OfferCategory::Hotel,
        OfferCategory::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferCategory::Flight => "flight",
            OfferCategory::Hotel => "hotel",
            OfferCategory::Activity => "activity",
        }
    }

    /// Plural label used when rendering grouped offers.
    pub fn plural(&self) -> &'static str {
        match self {
            OfferCategory::Flight => "Flights",
            OfferCategory::Hotel => "Hotels",
            OfferCategory::Activity => "Activities",
        }
    }
}

impl fmt::Display for OfferCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OfferCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flight" | "flights" => Ok(OfferCategory::Flight),
            "hotel" | "hotels" => Ok(OfferCategory::Hotel),
            "activity" | "activities" => Ok(OfferCategory::Activity),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// An amount of money in minor units of an ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount_cents: i64,
    currency: String,
}

impl Money {
    /// Creates a Money value. Currency codes are normalized to upper case.
    pub fn new(amount_cents: i64, currency: impl Into<String>) -> Result<Self, ValidationError> {
        let currency = currency.into().trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter ISO 4217 code",
            ));
        }
        if amount_cents < 0 {
            return Err(ValidationError::out_of_range("amount", 0, i64::MAX, amount_cents));
        }
        Ok(Self {
            amount_cents,
            currency,
        })
    }

    /// Parses a decimal string such as `"1234.5"` as returned by inventory APIs.
    ///
    /// Fractions beyond two digits are truncated.
    pub fn parse_decimal(amount: &str, currency: &str) -> Result<Self, ValidationError> {
        let amount = amount.trim();
        let (whole, fraction) = match amount.split_once('.') {
            Some((w, f)) => (w, f),
            None => (amount, ""),
        };
        let invalid = || ValidationError::invalid_format("amount", format!("'{}' is not a decimal", amount));

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction[..2].parse().map_err(|_| invalid())?,
        };
        let total = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .ok_or_else(invalid)?;
        Self::new(total, currency)
    }

    /// Zero in the given currency.
    pub fn zero(currency: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(0, currency)
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, ValidationError> {
        if self.currency != other.currency {
            return Err(ValidationError::invalid_format(
                "currency",
                format!("cannot add {} to {}", other.currency, self.currency),
            ));
        }
        let sum = self
            .amount_cents
            .checked_add(other.amount_cents)
            .ok_or_else(|| ValidationError::invalid_format("amount", "overflow"))?;
        Money::new(sum, self.currency.clone())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{:02}",
            self.currency,
            self.amount_cents / 100,
            self.amount_cents % 100
        )
    }
}

/// A normalized flight, hotel or activity offer.
///
/// Produced by inventory adapters and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Provider-assigned identifier.
    pub id: String,
    pub category: OfferCategory,
    /// Name of the provider that returned the offer.
    pub provider: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    /// Provider-specific descriptive metadata.
    #[serde(default)]
    pub details: serde_json::Value,
}

impl Offer {
    pub fn new(
        id: impl Into<String>,
        category: OfferCategory,
        provider: impl Into<String>,
        title: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            provider: provider.into(),
            title: title.into(),
            description: String::new(),
            price,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// One-line summary used in prompts and emails.
    pub fn summary(&self) -> String {
        if self.description.is_empty() {
            format!("{} ({}) - {}", self.title, self.id, self.price)
        } else {
            format!(
                "{} ({}) - {}: {}",
                self.title, self.id, self.price, self.description
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(cents: i64) -> Money {
        Money::new(cents, "usd").unwrap()
    }

    #[test]
    fn money_normalizes_currency() {
        assert_eq!(usd(100).currency(), "USD");
    }

    #[test]
    fn money_rejects_invalid_currency() {
        assert!(Money::new(100, "dollars").is_err());
        assert!(Money::new(100, "").is_err());
    }

    #[test]
    fn money_rejects_negative_amounts() {
        assert!(Money::new(-1, "USD").is_err());
    }

    #[test]
    fn money_parses_decimals() {
        assert_eq!(Money::parse_decimal("1234.56", "EUR").unwrap().amount_cents(), 123456);
        assert_eq!(Money::parse_decimal("99.5", "EUR").unwrap().amount_cents(), 9950);
        assert_eq!(Money::parse_decimal("80", "EUR").unwrap().amount_cents(), 8000);
        assert_eq!(Money::parse_decimal("10.999", "EUR").unwrap().amount_cents(), 1099);
    }

    #[test]
    fn money_rejects_non_numeric_decimals() {
        assert!(Money::parse_decimal("abc", "USD").is_err());
        assert!(Money::parse_decimal("-5.00", "USD").is_err());
        assert!(Money::parse_decimal(".50", "USD").is_err());
    }

    #[test]
    fn money_displays_with_two_decimals() {
        assert_eq!(usd(123405).to_string(), "USD 1234.05");
    }

    #[test]
    fn money_addition_requires_same_currency() {
        let eur = Money::new(100, "EUR").unwrap();
        assert!(usd(100).checked_add(&eur).is_err());
        assert_eq!(usd(100).checked_add(&usd(250)).unwrap(), usd(350));
    }

    #[test]
    fn category_parses_singular_and_plural() {
        assert_eq!("Flights".parse::<OfferCategory>().unwrap(), OfferCategory::Flight);
        assert_eq!("hotel".parse::<OfferCategory>().unwrap(), OfferCategory::Hotel);
        assert!("cruise".parse::<OfferCategory>().is_err());
    }

    #[test]
    fn offer_summary_includes_price_and_id() {
        let offer = Offer::new("FL-1", OfferCategory::Flight, "amadeus", "JFK to NRT", usd(85000));
        let summary = offer.summary();
        assert!(summary.contains("FL-1"));
        assert!(summary.contains("USD 850.00"));
    }
}

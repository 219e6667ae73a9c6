//! Resolution of which presented offers a booking reply refers to.

use crate::domain::foundation::ValidationError;
use crate::domain::travel::{Offer, SearchResults};

const ORDINALS: [(&str, usize); 10] = [
    ("first", 0),
    ("1st", 0),
    ("second", 1),
    ("2nd", 1),
    ("third", 2),
    ("3rd", 2),
    ("fourth", 3),
    ("4th", 3),
    ("fifth", 4),
    ("5th", 4),
];

const NUMBER_MARKERS: [&str; 4] = ["option", "number", "no", "choice"];

/// Picks offers out of the latest search results from a free-text reply.
///
/// Resolution order:
/// 1. Offer ids quoted in the message select exactly those offers.
/// 2. An ordinal ("first", "2nd", "option 3", "#2") selects that position
///    in every category that has it.
/// 3. Otherwise the first offer of each category is selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionResolver;

impl SelectionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, message: &str, results: &SearchResults) -> Result<Vec<Offer>, ValidationError> {
        if results.is_empty() {
            return Err(ValidationError::missing_parameter("selected_options"));
        }

        let lowercase = message.to_lowercase();

        let by_id: Vec<Offer> = results
            .iter()
            .flat_map(|(_, offers)| offers.iter())
            .filter(|o| !o.id.is_empty() && mentions_id(&lowercase, &o.id.to_lowercase()))
            .cloned()
            .collect();
        if !by_id.is_empty() {
            return Ok(by_id);
        }

        let position = ordinal_position(&lowercase).unwrap_or(0);
        let selected: Vec<Offer> = results
            .iter()
            .filter_map(|(_, offers)| offers.get(position).cloned())
            .collect();

        if selected.is_empty() {
            return Err(ValidationError::out_of_range(
                "selected_options",
                1,
                results.iter().map(|(_, o)| o.len()).max().unwrap_or(0) as i64,
                position as i64 + 1,
            ));
        }
        Ok(selected)
    }
}

/// True when `id` occurs in the message as a whole token, so `HT-42` does
/// not match inside `HT-420`.
fn mentions_id(lowercase: &str, id: &str) -> bool {
    lowercase.match_indices(id).any(|(start, _)| {
        let before = lowercase[..start].chars().next_back();
        let after = lowercase[start + id.len()..].chars().next();
        !before.is_some_and(is_id_char) && !after.is_some_and(is_id_char)
    })
}

fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Zero-based position named by the message, if any.
fn ordinal_position(lowercase: &str) -> Option<usize> {
    let tokens: Vec<&str> = lowercase
        .split(|c: char| !c.is_alphanumeric() && c != '#')
        .filter(|t| !t.is_empty())
        .collect();

    for (i, token) in tokens.iter().enumerate() {
        if let Some((_, position)) = ORDINALS.iter().find(|(word, _)| word == token) {
            return Some(*position);
        }
        if let Some(number) = token.strip_prefix('#').and_then(parse_position) {
            return Some(number);
        }
        if NUMBER_MARKERS.contains(token) {
            if let Some(number) = tokens.get(i + 1).and_then(|t| parse_position(t)) {
                return Some(number);
            }
        }
    }
    None
}

fn parse_position(token: &str) -> Option<usize> {
    token.parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::travel::{Money, OfferCategory};

    fn offer(id: &str, category: OfferCategory) -> Offer {
        Offer::new(id, category, "test", id, Money::new(1000, "USD").unwrap())
    }

    fn results() -> SearchResults {
        let mut results = SearchResults::new();
        results.insert(
            OfferCategory::Flight,
            vec![offer("FL-1", OfferCategory::Flight), offer("FL-2", OfferCategory::Flight)],
        );
        results.insert(
            OfferCategory::Hotel,
            vec![
                offer("HT-1", OfferCategory::Hotel),
                offer("HT-2", OfferCategory::Hotel),
                offer("HT-3", OfferCategory::Hotel),
            ],
        );
        results
    }

    fn ids(offers: &[Offer]) -> Vec<&str> {
        offers.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn first_option_selects_first_of_each_category() {
        let selected = SelectionResolver::new()
            .resolve("please book the first option", &results())
            .unwrap();
        assert_eq!(ids(&selected), vec!["FL-1", "HT-1"]);
    }

    #[test]
    fn ordinal_beyond_a_category_skips_it() {
        let selected = SelectionResolver::new()
            .resolve("book the third one", &results())
            .unwrap();
        assert_eq!(ids(&selected), vec!["HT-3"]);
    }

    #[test]
    fn numbered_option_is_recognized() {
        let resolver = SelectionResolver::new();
        assert_eq!(ids(&resolver.resolve("book option 2", &results()).unwrap()), vec!["FL-2", "HT-2"]);
        assert_eq!(ids(&resolver.resolve("confirm #2 please", &results()).unwrap()), vec!["FL-2", "HT-2"]);
    }

    #[test]
    fn explicit_ids_take_precedence() {
        let selected = SelectionResolver::new()
            .resolve("book fl-2 and HT-3, the first ones are too pricey", &results())
            .unwrap();
        assert_eq!(ids(&selected), vec!["FL-2", "HT-3"]);
    }

    #[test]
    fn id_prefix_of_another_id_is_not_selected() {
        let mut results = SearchResults::new();
        results.insert(
            OfferCategory::Hotel,
            vec![offer("HT-42", OfferCategory::Hotel), offer("HT-420", OfferCategory::Hotel)],
        );
        let resolver = SelectionResolver::new();

        assert_eq!(ids(&resolver.resolve("book HT-420", &results).unwrap()), vec!["HT-420"]);
        assert_eq!(ids(&resolver.resolve("book ht-42, thanks", &results).unwrap()), vec!["HT-42"]);
    }

    #[test]
    fn id_embedded_in_a_longer_token_is_ignored() {
        let selected = SelectionResolver::new()
            .resolve("book xfl-2 please", &results())
            .unwrap();
        assert_eq!(ids(&selected), vec!["FL-1", "HT-1"]);
    }

    #[test]
    fn no_ordinal_defaults_to_first() {
        let selected = SelectionResolver::new().resolve("book it", &results()).unwrap();
        assert_eq!(ids(&selected), vec!["FL-1", "HT-1"]);
    }

    #[test]
    fn out_of_range_ordinal_is_an_error() {
        assert!(SelectionResolver::new().resolve("book option 9", &results()).is_err());
    }

    #[test]
    fn empty_results_are_an_error() {
        let err = SelectionResolver::new()
            .resolve("book it", &SearchResults::new())
            .unwrap_err();
        assert_eq!(err, ValidationError::missing_parameter("selected_options"));
    }
}

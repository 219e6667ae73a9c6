//! Classification of the customer's reply to presented options.

use serde::{Deserialize, Serialize};

use super::WorkflowStep;

/// Purpose of the latest customer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Purchase the presented options.
    Book,
    /// Search again with the same or adjusted parameters.
    ReviseSearch,
    /// Anything else; the request needs to be re-interpreted.
    Clarify,
}

impl Intent {
    /// Step that follows `PresentOptions` for this intent.
    pub fn next_step(&self) -> WorkflowStep {
        match self {
            Intent::Book => WorkflowStep::ProcessBooking,
            Intent::ReviseSearch => WorkflowStep::SearchOptions,
            Intent::Clarify => WorkflowStep::UnderstandRequest,
        }
    }
}

/// Classifies a customer message into an [`Intent`].
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, message: &str) -> Intent;
}

/// Case-insensitive substring matching on keyword lists.
///
/// Booking keywords are checked first, so a message containing both booking
/// and revision language is a booking.
#[derive(Debug, Clone)]
pub struct KeywordIntentClassifier {
    book_keywords: Vec<String>,
    revise_keywords: Vec<String>,
}

impl KeywordIntentClassifier {
    pub fn new() -> Self {
        Self {
            book_keywords: vec!["book".to_string(), "confirm".to_string()],
            revise_keywords: vec!["different".to_string(), "other options".to_string()],
        }
    }

    /// Replaces the keyword lists. Keywords are matched lower-cased.
    pub fn with_keywords(book: &[&str], revise: &[&str]) -> Self {
        Self {
            book_keywords: book.iter().map(|k| k.to_lowercase()).collect(),
            revise_keywords: revise.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, message: &str) -> Intent {
        let lowercase = message.to_lowercase();

        if self.book_keywords.iter().any(|k| lowercase.contains(k.as_str())) {
            return Intent::Book;
        }
        if self.revise_keywords.iter().any(|k| lowercase.contains(k.as_str())) {
            return Intent::ReviseSearch;
        }
        Intent::Clarify
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classify(message: &str) -> Intent {
        KeywordIntentClassifier::new().classify(message)
    }

    #[test]
    fn booking_language_selects_book() {
        assert_eq!(classify("please book the first option"), Intent::Book);
        assert_eq!(classify("I CONFIRM"), Intent::Book);
        assert_eq!(classify("Booking sounds good"), Intent::Book);
    }

    #[test]
    fn revision_language_selects_revise_search() {
        assert_eq!(classify("show me something different"), Intent::ReviseSearch);
        assert_eq!(classify("any Other Options?"), Intent::ReviseSearch);
    }

    #[test]
    fn booking_wins_over_revision() {
        assert_eq!(classify("book a different hotel"), Intent::Book);
    }

    #[test]
    fn everything_else_is_clarify() {
        assert_eq!(classify("what about the weather?"), Intent::Clarify);
        assert_eq!(classify(""), Intent::Clarify);
    }

    #[test]
    fn intents_map_to_successor_steps() {
        assert_eq!(Intent::Book.next_step(), WorkflowStep::ProcessBooking);
        assert_eq!(Intent::ReviseSearch.next_step(), WorkflowStep::SearchOptions);
        assert_eq!(Intent::Clarify.next_step(), WorkflowStep::UnderstandRequest);
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let classifier = KeywordIntentClassifier::with_keywords(&["Reserve"], &["more"]);
        assert_eq!(classifier.classify("reserve it"), Intent::Book);
        assert_eq!(classifier.classify("book it"), Intent::Clarify);
        assert_eq!(classifier.classify("show more"), Intent::ReviseSearch);
    }

    fn mixed_case(word: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
            word.chars()
                .zip(upper)
                .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    // Filler text free of every keyword fragment.
    fn filler() -> impl Strategy<Value = String> {
        "[a-z ?!.,]{0,30}".prop_filter("no keywords", |s| {
            !s.contains("book")
                && !s.contains("confirm")
                && !s.contains("different")
                && !s.contains("other options")
        })
    }

    proptest! {
        #[test]
        fn any_message_with_book_or_confirm_is_book(
            prefix in ".{0,40}",
            keyword in prop_oneof![mixed_case("book"), mixed_case("confirm")],
            suffix in ".{0,40}",
        ) {
            let message = format!("{}{}{}", prefix, keyword, suffix);
            prop_assert_eq!(classify(&message), Intent::Book);
        }

        #[test]
        fn revision_without_booking_is_revise_search(
            prefix in filler(),
            keyword in prop_oneof![mixed_case("different"), mixed_case("other options")],
            suffix in filler(),
        ) {
            let message = format!("{} {} {}", prefix, keyword, suffix);
            prop_assert_eq!(classify(&message), Intent::ReviseSearch);
        }

        #[test]
        fn messages_without_keywords_are_clarify(message in filler()) {
            prop_assert_eq!(classify(&message), Intent::Clarify);
        }
    }
}

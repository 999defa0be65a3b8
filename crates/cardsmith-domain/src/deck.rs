//! Deck module - named, persisted collections of flashcards

use crate::Flashcard;
use std::fmt;

/// Unique identifier for a deck based on UUIDv7
///
/// UUIDv7 keeps deck identifiers chronologically sortable, so listing a
/// user's decks newest-first is an ordering on the identifier itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeckId(u128);

impl DeckId {
    /// Generate a new UUIDv7-based DeckId
    ///
    /// # Examples
    ///
    /// ```
    /// use cardsmith_domain::DeckId;
    ///
    /// let id = DeckId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a DeckId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a DeckId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use cardsmith_domain::DeckId;
    ///
    /// let id = DeckId::new();
    /// let parsed = DeckId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid deck id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for DeckId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A saved deck of flashcards
///
/// Decks are immutable once saved; saving again creates a new deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    /// Unique identifier
    pub id: DeckId,

    /// Username of the owner
    pub owner: String,

    /// Display name chosen at save time
    pub name: String,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// Cards in the order they were generated
    pub cards: Vec<Flashcard>,
}

/// Listing entry for a deck, without its cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSummary {
    /// Deck identifier
    pub id: DeckId,

    /// Deck name
    pub name: String,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,

    /// Number of cards in the deck
    pub card_count: usize,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Ordering follows the underlying value
        #[test]
        fn test_deck_id_ordering_property(a: u128, b: u128) {
            let id_a = DeckId::from_value(a);
            let id_b = DeckId::from_value(b);
            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        #[test]
        fn test_deck_id_string_roundtrip(value: u128) {
            let id = DeckId::from_value(value);
            match DeckId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}

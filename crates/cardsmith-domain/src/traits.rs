//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Deck, DeckId, DeckSummary, Flashcard};

/// Parameters for a single engine invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParams {
    /// Cap on generated tokens
    pub max_tokens: u32,

    /// Generation halts when any of these is produced
    pub stop_sequences: Vec<String>,
}

impl Default for InvocationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            stop_sequences: Vec::new(),
        }
    }
}

/// Trait for language-model inference
///
/// Implemented by the infrastructure layer (cardsmith-llm). One call is one
/// blocking, non-streaming completion that returns the generated text verbatim.
pub trait InferenceEngine {
    /// Error type for engine operations
    type Error;

    /// Generate a completion for a fully-formatted prompt
    fn invoke(&self, prompt: &str, params: &InvocationParams) -> Result<String, Self::Error>;

    /// Name of the underlying model, for reporting
    fn model_name(&self) -> &str;
}

/// Trait for storing and retrieving decks
///
/// Implemented by the infrastructure layer (cardsmith-store)
pub trait DeckStore {
    /// Error type for store operations
    type Error;

    /// Persist a new deck and return its identifier
    fn save_deck(&mut self, owner: &str, name: &str, cards: &[Flashcard]) -> Result<DeckId, Self::Error>;

    /// List a user's decks, newest first
    fn list_decks(&self, owner: &str) -> Result<Vec<DeckSummary>, Self::Error>;

    /// Load a deck's cards in saved order
    fn load_deck(&self, id: DeckId) -> Result<Vec<Flashcard>, Self::Error>;

    /// Get a deck with its metadata and cards
    fn get_deck(&self, id: DeckId) -> Result<Option<Deck>, Self::Error>;

    /// Delete a deck and its cards; returns whether it existed
    fn delete_deck(&mut self, id: DeckId) -> Result<bool, Self::Error>;
}

/// Trait for the (deliberately simple) user registry
pub trait UserStore {
    /// Error type for store operations
    type Error;

    /// Register a new user
    fn create_user(&mut self, username: &str, password: &str) -> Result<(), Self::Error>;

    /// Check a username/password pair
    fn verify_credentials(&self, username: &str, password: &str) -> Result<bool, Self::Error>;
}

//! Cardsmith Domain Layer
//!
//! This crate contains the core domain model for Cardsmith. It defines the
//! value objects and trait interfaces that all other layers depend upon, and
//! carries no infrastructure code.
//!
//! ## Key Concepts
//!
//! - **Flashcard**: A question/answer pair
//! - **Deck**: A named, persisted, ordered collection of flashcards owned by one user
//! - **Engine**: The language-model resource that turns a prompt into text
//!
//! ## Architecture
//!
//! - Pure domain types only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod deck;
pub mod flashcard;
pub mod traits;

// Re-exports for convenience
pub use deck::{Deck, DeckId, DeckSummary};
pub use flashcard::Flashcard;
pub use traits::InvocationParams;

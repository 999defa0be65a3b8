//! Command implementations.

pub mod account;
pub mod config;
pub mod decks;
pub mod generate;
pub mod transfer;

pub use self::account::{execute_account, execute_login, execute_logout, execute_whoami};
pub use self::config::execute_config;
pub use self::decks::{execute_decks, execute_delete, execute_review, execute_show};
pub use self::generate::execute_generate;
pub use self::transfer::{execute_export, execute_import};

use crate::config::Config;
use crate::error::{CliError, Result};
use cardsmith_domain::traits::DeckStore;
use cardsmith_domain::{Deck, DeckId};
use cardsmith_store::SqliteStore;

/// Open the configured database, creating its directory if needed.
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(SqliteStore::new(&path)?)
}

/// Load a deck owned by `owner`.
///
/// Decks belonging to other users are reported as not found.
pub fn find_owned_deck<S>(store: &S, id: &str, owner: &str) -> Result<Deck>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let deck_id = DeckId::from_string(id).map_err(CliError::InvalidInput)?;
    match store.get_deck(deck_id)? {
        Some(deck) if deck.owner == owner => Ok(deck),
        _ => Err(CliError::DeckNotFound(id.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardsmith_domain::Flashcard;

    #[test]
    fn test_find_owned_deck() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store
            .save_deck("alice", "Colors", &[Flashcard::new("Sky?", "Blue")])
            .unwrap();

        let deck = find_owned_deck(&store, &id.to_string(), "alice").unwrap();
        assert_eq!(deck.name, "Colors");

        let other = find_owned_deck(&store, &id.to_string(), "bob");
        assert!(matches!(other, Err(CliError::DeckNotFound(_))));

        let bad = find_owned_deck(&store, "not-an-id", "alice");
        assert!(matches!(bad, Err(CliError::InvalidInput(_))));
    }
}

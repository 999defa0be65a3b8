//! Deck listing, display, deletion and review.

use super::find_owned_deck;
use crate::cli::{DeckArgs, DeleteArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::review::run_review;
use cardsmith_domain::traits::DeckStore;
use std::io::{self, Write};

/// List the user's decks, newest first.
pub fn execute_decks<S>(store: &S, owner: &str, formatter: &Formatter) -> Result<()>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let decks = store.list_decks(owner)?;
    println!("{}", formatter.format_decks(&decks)?);
    Ok(())
}

/// Print one deck.
pub fn execute_show<S>(args: DeckArgs, store: &S, owner: &str, formatter: &Formatter) -> Result<()>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let deck = find_owned_deck(store, &args.id, owner)?;
    println!("{}", formatter.format_deck(&deck)?);
    Ok(())
}

/// Delete a deck after confirmation.
pub fn execute_delete<S>(args: DeleteArgs, store: &mut S, owner: &str, formatter: &Formatter) -> Result<()>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let deck = find_owned_deck(store, &args.id, owner)?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        print!(
            "Delete deck '{}' ({} cards)? [y/N] ",
            deck.name,
            deck.cards.len()
        );
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    if store.delete_deck(deck.id)? {
        println!("{}", formatter.success(&format!("Deleted deck '{}'", deck.name)));
    } else {
        println!("{}", formatter.warning("Deck was already deleted"));
    }
    Ok(())
}

/// Review a deck interactively.
pub fn execute_review<S>(args: DeckArgs, store: &S, owner: &str, formatter: &Formatter) -> Result<()>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let deck = find_owned_deck(store, &args.id, owner)?;
    run_review(deck.cards, &deck.name, formatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use cardsmith_domain::Flashcard;
    use cardsmith_store::SqliteStore;

    #[test]
    fn test_delete_with_yes() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store
            .save_deck("alice", "Colors", &[Flashcard::new("Sky?", "Blue")])
            .unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let args = DeleteArgs {
            id: id.to_string(),
            yes: true,
        };
        execute_delete(args, &mut store, "alice", &formatter).unwrap();
        assert!(store.get_deck(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_other_users_deck() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let id = store
            .save_deck("alice", "Colors", &[Flashcard::new("Sky?", "Blue")])
            .unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let args = DeleteArgs {
            id: id.to_string(),
            yes: true,
        };
        let result = execute_delete(args, &mut store, "mallory", &formatter);
        assert!(matches!(result, Err(CliError::DeckNotFound(_))));
        assert!(store.get_deck(id).unwrap().is_some());
    }
}

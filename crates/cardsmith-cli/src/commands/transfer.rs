//! Deck export and import.
//!
//! Both use the same `[{"question": ..., "answer": ...}]` array the model
//! is asked to produce, and import reads it through the same parser.

use super::find_owned_deck;
use crate::cli::{ExportArgs, ImportArgs};
use crate::error::{CliError, Result};
use crate::output::{cards_to_json, Formatter};
use cardsmith_domain::traits::DeckStore;
use cardsmith_generator::parse_flashcards;
use std::fs;

/// Write a deck's cards as JSON.
pub fn execute_export<S>(args: ExportArgs, store: &S, owner: &str, formatter: &Formatter) -> Result<()>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let deck = find_owned_deck(store, &args.id, owner)?;
    let json = cards_to_json(&deck.cards)?;

    match args.out {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!(
                "{}",
                formatter.success(&format!(
                    "Exported {} cards to {}",
                    deck.cards.len(),
                    path.display()
                ))
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Create a deck from a JSON file.
pub fn execute_import<S>(args: ImportArgs, store: &mut S, owner: &str, formatter: &Formatter) -> Result<()>
where
    S: DeckStore,
    CliError: From<S::Error>,
{
    let contents = fs::read_to_string(&args.file)?;
    let parsed = parse_flashcards(&contents)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", args.file.display(), e)))?;

    if parsed.dropped > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("Skipped {} malformed entries", parsed.dropped))
        );
    }
    if parsed.flashcards.is_empty() {
        return Err(CliError::InvalidInput("No flashcards to import".to_string()));
    }

    let id = store.save_deck(owner, &args.name, &parsed.flashcards)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Imported {} cards into '{}' ({})",
            parsed.flashcards.len(),
            args.name.trim(),
            id
        ))
    );
    Ok(())
}

//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use cardsmith_domain::{Deck, DeckSummary, Flashcard};
use cardsmith_generator::GenerationResult;
use chrono::{DateTime, Local};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style, Width},
};

/// Column width for question/answer text in tables.
const TEXT_COLUMN_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format flashcards.
    pub fn format_flashcards(&self, cards: &[Flashcard]) -> Result<String> {
        match self.format {
            OutputFormat::Json => cards_to_json(cards),
            OutputFormat::Table => Ok(self.format_flashcards_table(cards)),
            OutputFormat::Quiet => Ok(cards
                .iter()
                .map(|c| c.question.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format flashcards as a table.
    fn format_flashcards_table(&self, cards: &[Flashcard]) -> String {
        if cards.is_empty() {
            return self.colorize("No flashcards.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Question", "Answer"]);

        for (idx, card) in cards.iter().enumerate() {
            builder.push_record([(idx + 1).to_string(), card.question.clone(), card.answer.clone()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(TEXT_COLUMN_WIDTH)))
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a deck listing.
    pub fn format_decks(&self, decks: &[DeckSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = decks
                    .iter()
                    .map(|d| {
                        serde_json::json!({
                            "id": d.id.to_string(),
                            "name": d.name,
                            "created_at": d.created_at,
                            "card_count": d.card_count,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(decks
                .iter()
                .map(|d| d.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if decks.is_empty() {
                    return Ok(self.colorize("No decks found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Cards", "Created"]);
                for deck in decks {
                    builder.push_record([
                        deck.id.to_string(),
                        deck.name.clone(),
                        deck.card_count.to_string(),
                        format_timestamp(deck.created_at),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format a deck with its cards.
    pub fn format_deck(&self, deck: &Deck) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": deck.id.to_string(),
                "name": deck.name,
                "owner": deck.owner,
                "created_at": deck.created_at,
                "cards": cards_as_values(&deck.cards),
            }))?),
            OutputFormat::Quiet => self.format_flashcards(&deck.cards),
            OutputFormat::Table => {
                let header = format!(
                    "{} ({} cards, created {})",
                    self.colorize(&deck.name, "cyan"),
                    deck.cards.len(),
                    format_timestamp(deck.created_at)
                );
                Ok(format!("{}\n{}", header, self.format_flashcards_table(&deck.cards)))
            }
        }
    }

    /// Summarize a generation run.
    pub fn generation_summary(&self, result: &GenerationResult) -> String {
        let meta = &result.metadata;
        let mut lines = vec![self.success(&format!(
            "Generated {} flashcard(s) from {}/{} chunk(s) with {} in {:.1}s",
            result.flashcards.len(),
            meta.chunks_processed,
            meta.chunks_total,
            meta.model_name,
            meta.processing_time_ms as f64 / 1000.0
        ))];

        for failure in &result.failures {
            lines.push(self.warning(&format!(
                "Chunk {} produced no flashcards: {}",
                failure.chunk_index, failure.reason
            )));
        }
        if meta.entries_dropped > 0 {
            lines.push(self.warning(&format!(
                "Dropped {} malformed entr{}",
                meta.entries_dropped,
                if meta.entries_dropped == 1 { "y" } else { "ies" }
            )));
        }
        if meta.duplicates_removed > 0 {
            lines.push(self.info(&format!("Removed {} repeated question(s)", meta.duplicates_removed)));
        }
        if meta.aborted {
            lines.push(self.warning("Generation was stopped early"));
        }

        lines.join("\n")
    }

    /// Render one side of a card during review.
    pub fn review_card(&self, position: usize, total: usize, card: &Flashcard, show_answer: bool) -> String {
        let mut out = format!(
            "{}\n{} {}\n",
            self.colorize(&format!("Card {}/{}", position, total), "magenta"),
            self.colorize("Q:", "cyan"),
            card.question
        );
        if show_answer {
            out.push_str(&format!("{} {}\n", self.colorize("A:", "green"), card.answer));
        } else {
            out.push_str(&self.colorize("(f to flip)\n", "blue"));
        }
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn cards_as_values(cards: &[Flashcard]) -> Vec<serde_json::Value> {
    cards
        .iter()
        .map(|c| serde_json::json!({ "question": c.question, "answer": c.answer }))
        .collect()
}

/// Cards as the `[{"question": ..., "answer": ...}]` exchange format.
pub fn cards_to_json(cards: &[Flashcard]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&cards_as_values(cards))?)
}

/// Unix seconds as local date and time.
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}

//! Interactive deck review.
//!
//! Navigation state lives in [`ReviewSession`]; [`run_review`] is the
//! readline loop that drives it.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cardsmith_domain::Flashcard;
use rand::Rng;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Position and visibility state while reviewing a deck.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    cards: Vec<Flashcard>,
    index: usize,
    show_answer: bool,
}

impl ReviewSession {
    /// Start at the first card with its answer hidden.
    pub fn new(cards: Vec<Flashcard>) -> Result<Self> {
        if cards.is_empty() {
            return Err(CliError::InvalidInput("Deck has no cards to review".to_string()));
        }
        Ok(Self {
            cards,
            index: 0,
            show_answer: false,
        })
    }

    /// The card being shown.
    pub fn current(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    /// Zero-based position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether there are no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether the answer side is visible.
    pub fn show_answer(&self) -> bool {
        self.show_answer
    }

    /// Move forward, stopping at the last card.
    pub fn next(&mut self) {
        self.index = (self.index + 1).min(self.cards.len() - 1);
        self.show_answer = false;
    }

    /// Move back, stopping at the first card.
    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
        self.show_answer = false;
    }

    /// Toggle the answer.
    pub fn flip(&mut self) {
        self.show_answer = !self.show_answer;
    }

    /// Jump to a random card.
    pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.index = rng.gen_range(0..self.cards.len());
        self.show_answer = false;
    }
}

/// A keystroke command in review mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Next card
    Next,
    /// Previous card
    Prev,
    /// Show or hide the answer
    Flip,
    /// Random card
    Random,
    /// Leave review
    Quit,
    /// Show key help
    Help,
}

impl ReviewAction {
    /// Parse a line of input.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "next" | "" => Some(Self::Next),
            "p" | "prev" => Some(Self::Prev),
            "f" | "flip" => Some(Self::Flip),
            "r" | "random" => Some(Self::Random),
            "q" | "quit" | "exit" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Run the interactive review loop.
pub fn run_review(cards: Vec<Flashcard>, deck_name: &str, formatter: &Formatter) -> Result<()> {
    let mut session = ReviewSession::new(cards)?;
    let mut rng = rand::thread_rng();

    println!(
        "{}",
        formatter.info(&format!(
            "Reviewing '{}' ({} cards). Type 'h' for keys, 'q' to quit",
            deck_name,
            session.len()
        ))
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    print_card(&session, formatter);

    loop {
        match editor.readline("review> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }

                match ReviewAction::parse(&line) {
                    Some(ReviewAction::Quit) => break,
                    Some(ReviewAction::Help) => {
                        print_help(formatter);
                        continue;
                    }
                    Some(ReviewAction::Next) => session.next(),
                    Some(ReviewAction::Prev) => session.prev(),
                    Some(ReviewAction::Flip) => session.flip(),
                    Some(ReviewAction::Random) => session.random(&mut rng),
                    None => {
                        eprintln!(
                            "{}",
                            formatter.error(&format!("Unknown key: {}. Type 'h' for help.", line.trim()))
                        );
                        continue;
                    }
                }
                print_card(&session, formatter);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'q' to quit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

fn print_card(session: &ReviewSession, formatter: &Formatter) {
    println!(
        "{}",
        formatter.review_card(
            session.index() + 1,
            session.len(),
            session.current(),
            session.show_answer()
        )
    );
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("review_history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Review keys:"));
    println!();
    println!("  n, <enter>  - Next card");
    println!("  p           - Previous card");
    println!("  f           - Flip (show/hide answer)");
    println!("  r           - Random card");
    println!("  h, ?        - Show this help");
    println!("  q           - Quit review");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(n: usize) -> ReviewSession {
        let cards = (1..=n)
            .map(|i| Flashcard::new(format!("Q{}", i), format!("A{}", i)))
            .collect();
        ReviewSession::new(cards).unwrap()
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert!(matches!(ReviewSession::new(Vec::new()), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_starts_at_first_card_hidden() {
        let s = session(3);
        assert_eq!(s.index(), 0);
        assert_eq!(s.current().question, "Q1");
        assert!(!s.show_answer());
    }

    #[test]
    fn test_next_clamps_and_hides_answer() {
        let mut s = session(2);
        s.flip();
        s.next();
        assert_eq!(s.index(), 1);
        assert!(!s.show_answer());

        s.flip();
        s.next();
        assert_eq!(s.index(), 1, "next stays on the last card");
        assert!(!s.show_answer());
    }

    #[test]
    fn test_prev_clamps_at_start() {
        let mut s = session(2);
        s.flip();
        s.prev();
        assert_eq!(s.index(), 0);
        assert!(!s.show_answer());
    }

    #[test]
    fn test_flip_toggles() {
        let mut s = session(1);
        s.flip();
        assert!(s.show_answer());
        s.flip();
        assert!(!s.show_answer());
    }

    #[test]
    fn test_random_stays_in_range_and_hides_answer() {
        let mut s = session(5);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            s.flip();
            s.random(&mut rng);
            assert!(s.index() < 5);
            assert!(!s.show_answer());
        }
    }

    #[test]
    fn test_single_card_navigation() {
        let mut s = session(1);
        s.next();
        s.prev();
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(ReviewAction::parse("n"), Some(ReviewAction::Next));
        assert_eq!(ReviewAction::parse(""), Some(ReviewAction::Next));
        assert_eq!(ReviewAction::parse(" P "), Some(ReviewAction::Prev));
        assert_eq!(ReviewAction::parse("f"), Some(ReviewAction::Flip));
        assert_eq!(ReviewAction::parse("r"), Some(ReviewAction::Random));
        assert_eq!(ReviewAction::parse("quit"), Some(ReviewAction::Quit));
        assert_eq!(ReviewAction::parse("x"), None);
    }
}

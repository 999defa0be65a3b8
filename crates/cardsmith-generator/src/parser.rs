//! Parse LLM output into flashcards
//!
//! The model answers in free text. The parser takes everything from the
//! first `[` to the last `]`, decodes it as a JSON array, and keeps the
//! entries that have both a `question` and an `answer` string. Malformed
//! entries are dropped one by one; only an unusable array fails the chunk.

use cardsmith_domain::Flashcard;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Why a chunk's output yielded no records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// No `[` ... `]` span in the output
    #[error("no JSON array found in model output")]
    NoJsonArray,

    /// The bracketed span is not valid JSON
    #[error("malformed JSON: {0}")]
    MalformedJson(String),
}

/// Records decoded from one chunk's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedChunk {
    /// Valid flashcards, in array order
    pub flashcards: Vec<Flashcard>,

    /// Array entries dropped as malformed
    pub dropped: usize,
}

/// Parse raw model output into flashcards
pub fn parse_flashcards(response: &str) -> Result<ParsedChunk, ParseFailure> {
    let json_str = locate_array(response).ok_or(ParseFailure::NoJsonArray)?;

    // The span starts with '[' and ends with ']', so it is an array or invalid
    let entries: Vec<Value> = serde_json::from_str(json_str)
        .map_err(|e| ParseFailure::MalformedJson(e.to_string()))?;

    let mut parsed = ParsedChunk::default();
    for (idx, entry) in entries.iter().enumerate() {
        match parse_flashcard_json(entry) {
            Ok(card) => parsed.flashcards.push(card),
            Err(e) => {
                debug!("Dropping entry {}: {}", idx, e);
                parsed.dropped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Slice from the first `[` to the last `]`, inclusive
fn locate_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if start < end {
        Some(&response[start..=end])
    } else {
        None
    }
}

/// Parse a single flashcard from JSON
fn parse_flashcard_json(json: &Value) -> Result<Flashcard, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Entry is not a JSON object".to_string())?;

    let question = required_text(obj, "question")?;
    let answer = required_text(obj, "answer")?;

    Ok(Flashcard { question, answer })
}

fn required_text(obj: &serde_json::Map<String, Value>, field: &str) -> Result<String, String> {
    let value = obj
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing or invalid '{}'", field))?
        .trim();

    if value.is_empty() {
        return Err(format!("Empty '{}'", field));
    }
    Ok(value.to_string())
}

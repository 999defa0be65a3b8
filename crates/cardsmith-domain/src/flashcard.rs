//! Flashcard module - the unit of study material

/// A question/answer pair
///
/// Both fields are required. Records missing either one are rejected by the
/// response parser instead of being filled with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Flashcard {
    /// Prompt side of the card
    pub question: String,

    /// Answer side of the card
    pub answer: String,
}

impl Flashcard {
    /// Create a new flashcard
    ///
    /// # Examples
    ///
    /// ```
    /// use cardsmith_domain::Flashcard;
    ///
    /// let card = Flashcard::new("What color is the sky?", "Blue");
    /// assert_eq!(card.answer, "Blue");
    /// ```
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Key used to detect repeated questions across chunks
    ///
    /// Lowercased, with runs of whitespace collapsed to one space.
    pub fn question_key(&self) -> String {
        self.question
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_flashcard() {
        let card = Flashcard::new("Q", "A");
        assert_eq!(card.question, "Q");
        assert_eq!(card.answer, "A");
    }

    #[test]
    fn test_question_key_normalizes() {
        let a = Flashcard::new("  What is   Rust? ", "A language");
        let b = Flashcard::new("what is rust?", "Something else");
        assert_eq!(a.question_key(), b.question_key());
        assert_eq!(a.question_key(), "what is rust?");
    }
}

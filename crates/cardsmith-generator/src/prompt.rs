//! Prompt construction for flashcard generation

use serde::{Deserialize, Serialize};

/// Turn delimiters for a model's chat convention
///
/// The prompt builder wraps the user turn with these markers and leaves the
/// assistant turn open, so the model produces exactly one reply. The stop
/// sequences end generation at the close of that reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTemplate {
    /// Opens the user turn
    pub user_prefix: String,

    /// Closes the user turn
    pub user_suffix: String,

    /// Opens the assistant turn
    pub assistant_prefix: String,

    /// Stop sequences passed to the engine
    pub stop_sequences: Vec<String>,
}

impl ChatTemplate {
    /// Phi-3 instruct convention
    pub fn phi3() -> Self {
        Self {
            user_prefix: "<|user|>\n".to_string(),
            user_suffix: "\n<|end|>\n".to_string(),
            assistant_prefix: "<|assistant|>".to_string(),
            stop_sequences: vec!["<|end|>".to_string()],
        }
    }

    /// ChatML convention (Qwen, many fine-tunes)
    pub fn chatml() -> Self {
        Self {
            user_prefix: "<|im_start|>user\n".to_string(),
            user_suffix: "<|im_end|>\n".to_string(),
            assistant_prefix: "<|im_start|>assistant\n".to_string(),
            stop_sequences: vec!["<|im_end|>".to_string()],
        }
    }

    /// Llama 3 instruct convention
    pub fn llama3() -> Self {
        Self {
            user_prefix: "<|start_header_id|>user<|end_header_id|>\n\n".to_string(),
            user_suffix: "<|eot_id|>".to_string(),
            assistant_prefix: "<|start_header_id|>assistant<|end_header_id|>\n\n".to_string(),
            stop_sequences: vec!["<|eot_id|>".to_string()],
        }
    }

    /// Look up a built-in template by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "phi3" | "phi-3" => Some(Self::phi3()),
            "chatml" => Some(Self::chatml()),
            "llama3" | "llama-3" => Some(Self::llama3()),
            _ => None,
        }
    }

    /// Validate the template
    pub fn validate(&self) -> Result<(), String> {
        if self.stop_sequences.iter().any(|s| s.is_empty()) {
            return Err("stop sequences must not be empty strings".to_string());
        }
        Ok(())
    }
}

impl Default for ChatTemplate {
    fn default() -> Self {
        Self::phi3()
    }
}

/// Builds prompts for the LLM to generate flashcards
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    template: ChatTemplate,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(template: ChatTemplate) -> Self {
        Self { template }
    }

    /// Build the complete prompt for one chunk
    pub fn build(&self, chunk: &str) -> String {
        let mut prompt = String::with_capacity(
            GENERATION_INSTRUCTIONS.len() + chunk.len() + 64,
        );

        prompt.push_str(&self.template.user_prefix);
        prompt.push_str(GENERATION_INSTRUCTIONS);
        prompt.push('\n');
        prompt.push_str(chunk);
        prompt.push_str(&self.template.user_suffix);
        prompt.push_str(&self.template.assistant_prefix);

        prompt
    }
}

pub(crate) const GENERATION_INSTRUCTIONS: &str = r#"Based on the following text, generate 5-10 flashcards depending on the amount of content, in JSON format.
Each flashcard should have a "question" and an "answer" field.
The questions should test understanding of key concepts from the text.
Format the response as a valid JSON array of objects.
Be creative with the questions.

Example format:
[
    {"question": "What is the main idea of the text?", "answer": "The main idea is..."},
    {"question": "Define the term X", "answer": "X is defined as..."},
    {"question": "What is true for X?", "answer": "Y is true when X..."}
]

Text to generate flashcards from:"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_flashcards;

    #[test]
    fn test_phi3_wrapping() {
        let prompt = PromptBuilder::default().build("The sky is blue.");
        assert!(prompt.starts_with("<|user|>\n"));
        assert!(prompt.ends_with("The sky is blue.\n<|end|>\n<|assistant|>"));
    }

    #[test]
    fn test_prompt_includes_instructions_and_chunk() {
        let prompt = PromptBuilder::default().build("Grass is green.");
        assert!(prompt.contains("generate 5-10 flashcards"));
        assert!(prompt.contains("\"question\""));
        assert!(prompt.contains("\"answer\""));
        assert!(prompt.contains("Text to generate flashcards from:\nGrass is green."));
    }

    #[test]
    fn test_custom_template() {
        let builder = PromptBuilder::new(ChatTemplate::chatml());
        let prompt = builder.build("chunk");
        assert!(prompt.starts_with("<|im_start|>user\n"));
        assert!(prompt.ends_with("chunk<|im_end|>\n<|im_start|>assistant\n"));
    }

    #[test]
    fn test_few_shot_example_is_valid_json() {
        let parsed = parse_flashcards(GENERATION_INSTRUCTIONS).unwrap();
        assert_eq!(parsed.flashcards.len(), 3);
        assert_eq!(parsed.dropped, 0);
        assert_eq!(parsed.flashcards[1].question, "Define the term X");
    }

    #[test]
    fn test_presets() {
        assert_eq!(ChatTemplate::preset("Phi3"), Some(ChatTemplate::phi3()));
        assert_eq!(ChatTemplate::preset("chatml"), Some(ChatTemplate::chatml()));
        assert_eq!(ChatTemplate::preset("llama-3"), Some(ChatTemplate::llama3()));
        assert!(ChatTemplate::preset("gpt2").is_none());
    }

    #[test]
    fn test_template_validation() {
        let mut template = ChatTemplate::phi3();
        assert!(template.validate().is_ok());
        template.stop_sequences.push(String::new());
        assert!(template.validate().is_err());
    }
}

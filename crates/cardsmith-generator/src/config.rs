//! Configuration for the generator

use crate::prompt::ChatTemplate;
use cardsmith_domain::InvocationParams;
use serde::{Deserialize, Serialize};

/// Configuration for the flashcard generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum chunk size (characters)
    pub max_chunk_size: usize,

    /// Token cap per engine call
    pub max_new_tokens: u32,

    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Drop flashcards whose question repeats an earlier one
    pub deduplicate: bool,

    /// Collapse runs of whitespace before chunking
    pub normalize_whitespace: bool,

    /// Chat turn delimiters for the target model
    pub template: ChatTemplate,
}

impl GeneratorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_size == 0 {
            return Err("max_chunk_size must be greater than 0".to_string());
        }
        if self.max_new_tokens == 0 {
            return Err("max_new_tokens must be greater than 0".to_string());
        }
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.max_chunk_size > self.max_text_length {
            return Err("max_chunk_size cannot exceed max_text_length".to_string());
        }
        self.template.validate()
    }

    /// Parameters for each engine call
    pub fn invocation_params(&self) -> InvocationParams {
        InvocationParams {
            max_tokens: self.max_new_tokens,
            stop_sequences: self.template.stop_sequences.clone(),
        }
    }

    /// Small chunks, for short context windows
    pub fn compact() -> Self {
        Self {
            max_chunk_size: 500,
            max_new_tokens: 512,
            ..Self::default()
        }
    }

    /// Larger chunks and a higher token cap, for long context windows
    pub fn thorough() -> Self {
        Self {
            max_chunk_size: 3_000,
            max_new_tokens: 2_048,
            deduplicate: true,
            ..Self::default()
        }
    }

    /// Look up a preset by name (`default`, `compact`, `thorough`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "compact" => Some(Self::compact()),
            "thorough" => Some(Self::thorough()),
            _ => None,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1_000,
            max_new_tokens: 1_024,
            max_text_length: 500_000,
            deduplicate: false,
            normalize_whitespace: false,
            template: ChatTemplate::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chunk_size, 1000);
        assert_eq!(config.max_new_tokens, 1024);
        assert!(!config.deduplicate);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(GeneratorConfig::compact().validate().is_ok());
        assert!(GeneratorConfig::thorough().validate().is_ok());
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(GeneratorConfig::preset("Compact"), Some(GeneratorConfig::compact()));
        assert_eq!(GeneratorConfig::preset("thorough"), Some(GeneratorConfig::thorough()));
        assert_eq!(GeneratorConfig::preset("default"), Some(GeneratorConfig::default()));
        assert!(GeneratorConfig::preset("huge").is_none());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = GeneratorConfig {
            max_chunk_size: 0,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chunk_size_too_large() {
        let mut config = GeneratorConfig::default();
        config.max_chunk_size = config.max_text_length + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invocation_params_follow_template() {
        let config = GeneratorConfig::default();
        let params = config.invocation_params();
        assert_eq!(params.max_tokens, 1024);
        assert_eq!(params.stop_sequences, vec!["<|end|>"]);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = GeneratorConfig::from_toml("max_chunk_size = 250\ndeduplicate = true").unwrap();
        assert_eq!(config.max_chunk_size, 250);
        assert!(config.deduplicate);
        assert_eq!(config.template, ChatTemplate::phi3());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneratorConfig {
            template: ChatTemplate::chatml(),
            ..GeneratorConfig::thorough()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = GeneratorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}

//! Engine configuration

use serde::{Deserialize, Serialize};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model (Phi-3 mini, 4k context)
pub const DEFAULT_MODEL: &str = "phi3:mini";

/// Settings used once, when the engine is loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Inference server endpoint
    pub endpoint: String,

    /// Model name (or path, for servers that load by path)
    pub model: String,

    /// Context window in tokens
    pub context_size: u32,

    /// CPU threads used for inference
    pub thread_count: u32,

    /// Layers offloaded to the GPU
    pub gpu_layer_count: u32,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            context_size: 4096,
            thread_count: 8,
            gpu_layer_count: 35,
            timeout_secs: 300,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.context_size == 0 {
            return Err("context_size must be greater than 0".to_string());
        }
        if self.thread_count == 0 {
            return Err("thread_count must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.context_size, 4096);
        assert_eq!(config.gpu_layer_count, 35);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = EngineConfig::default();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.thread_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"model": "mistral"}"#).unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.thread_count, 8);
    }
}

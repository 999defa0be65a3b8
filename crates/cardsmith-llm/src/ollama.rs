//! Ollama Engine Implementation
//!
//! Provides integration with Ollama's local inference API.
//!
//! # Features
//!
//! - Blocking, non-streaming HTTP calls to `/api/generate`
//! - Raw prompts: the chat template is applied by the caller
//! - Load-time settings (context size, threads, GPU layers) sent as model options
//! - One request per invocation; failures are returned, never retried
//!
//! # Examples
//!
//! ```no_run
//! use cardsmith_llm::{EngineConfig, OllamaEngine};
//! use cardsmith_domain::InvocationParams;
//! use cardsmith_domain::traits::InferenceEngine;
//!
//! let engine = OllamaEngine::new(EngineConfig::default()).unwrap();
//! let params = InvocationParams { max_tokens: 64, stop_sequences: vec!["<|end|>".into()] };
//! let text = engine.invoke("<|user|>\nSay hi\n<|end|>\n<|assistant|>", &params).unwrap();
//! ```

use crate::config::EngineConfig;
use crate::LlmError;
use cardsmith_domain::traits::InferenceEngine;
use cardsmith_domain::InvocationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Ollama API engine for local LLM inference
pub struct OllamaEngine {
    config: EngineConfig,
    client: reqwest::blocking::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    raw: bool,
    options: OllamaOptions<'a>,
}

/// Model options understood by Ollama
#[derive(Serialize)]
struct OllamaOptions<'a> {
    num_predict: u32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
    num_ctx: u32,
    num_thread: u32,
    num_gpu: u32,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaEngine {
    /// Create a new Ollama engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: EngineConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Other)?;

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Ask the server to load the model weights now
    ///
    /// An empty prompt makes Ollama load the model without generating, so the
    /// first real chunk does not pay the load cost.
    pub fn warm_up(&self) -> Result<(), LlmError> {
        let params = InvocationParams {
            max_tokens: 0,
            stop_sequences: Vec::new(),
        };
        self.send_once(&self.generate_url(), "", &params).map(|_| ())
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'))
    }

    fn send_once(
        &self,
        url: &str,
        prompt: &str,
        params: &InvocationParams,
    ) -> Result<String, LlmError> {
        let request_body = OllamaGenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            raw: true,
            options: OllamaOptions {
                num_predict: params.max_tokens,
                stop: &params.stop_sequences,
                num_ctx: self.config.context_size,
                num_thread: self.config.thread_count,
                num_gpu: self.config.gpu_layer_count,
            },
        };

        let response = self
            .client
            .post(url)
            .json(&request_body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<OllamaGenerateResponse>()
                .map(|r| r.response)
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
        }

        let error_text = response
            .text()
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)))
    }
}

impl InferenceEngine for OllamaEngine {
    type Error = LlmError;

    fn invoke(&self, prompt: &str, params: &InvocationParams) -> Result<String, Self::Error> {
        let text = self.send_once(&self.generate_url(), prompt, params)?;
        debug!("Ollama returned {} chars", text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_engine_creation() {
        let engine = OllamaEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.model_name(), "phi3:mini");
        assert_eq!(engine.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_ollama_engine_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.context_size = 0;
        assert!(OllamaEngine::new(config).is_err());
    }

    #[test]
    fn test_generate_url_trims_slash() {
        let mut config = EngineConfig::default();
        config.endpoint = "http://example.test:11434/".to_string();
        let engine = OllamaEngine::new(config).unwrap();
        assert_eq!(engine.generate_url(), "http://example.test:11434/api/generate");
    }

    #[test]
    fn test_request_serialization() {
        let stop = vec!["<|end|>".to_string()];
        let body = OllamaGenerateRequest {
            model: "phi3:mini",
            prompt: "hello",
            stream: false,
            raw: true,
            options: OllamaOptions {
                num_predict: 1024,
                stop: &stop,
                num_ctx: 4096,
                num_thread: 8,
                num_gpu: 35,
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["raw"], true);
        assert_eq!(json["options"]["num_predict"], 1024);
        assert_eq!(json["options"]["stop"][0], "<|end|>");
        assert_eq!(json["options"]["num_gpu"], 35);
    }

    #[test]
    fn test_request_omits_empty_stop() {
        let stop: Vec<String> = Vec::new();
        let body = OllamaGenerateRequest {
            model: "m",
            prompt: "",
            stream: false,
            raw: true,
            options: OllamaOptions {
                num_predict: 0,
                stop: &stop,
                num_ctx: 1,
                num_thread: 1,
                num_gpu: 0,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["options"].get("stop").is_none());
    }

    #[test]
    fn test_ollama_error_handling() {
        // Unroutable port triggers a communication error
        let mut config = EngineConfig::default();
        config.endpoint = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 2;
        let engine = OllamaEngine::new(config).unwrap();

        let result = engine.invoke("test", &InvocationParams::default());
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    fn test_failed_invoke_is_not_retried() {
        let config = EngineConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            ..EngineConfig::default()
        };
        let engine = OllamaEngine::new(config).unwrap();

        let started = std::time::Instant::now();
        let result = engine.invoke("test", &InvocationParams::default());
        assert!(result.is_err());
        // A refused connection fails at once; any backoff sleep would show up here
        assert!(started.elapsed() < Duration::from_millis(900), "took {:?}", started.elapsed());
    }

    #[test]
    #[ignore] // Only run when Ollama is available
    fn test_ollama_invoke_integration() {
        let engine = OllamaEngine::new(EngineConfig::default()).unwrap();
        let params = InvocationParams {
            max_tokens: 16,
            stop_sequences: vec!["<|end|>".to_string()],
        };
        let text = engine
            .invoke("<|user|>\nSay hello\n<|end|>\n<|assistant|>", &params)
            .unwrap();
        assert!(!text.is_empty());
    }
}

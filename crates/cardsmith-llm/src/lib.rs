//! Cardsmith LLM Engine Layer
//!
//! Pluggable inference engine implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `InferenceEngine` trait from
//! `cardsmith-domain`, plus the handles that keep one loaded engine alive and
//! shared for the lifetime of the process.
//!
//! # Engines
//!
//! - `MockEngine`: Deterministic, scriptable engine for testing
//! - `OllamaEngine`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use cardsmith_llm::MockEngine;
//! use cardsmith_domain::InvocationParams;
//! use cardsmith_domain::traits::InferenceEngine;
//!
//! let engine = MockEngine::new("Hello from LLM!");
//! let result = engine.invoke("test prompt", &InvocationParams::default()).unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod ollama;

use cardsmith_domain::traits::InferenceEngine;
use cardsmith_domain::InvocationParams;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::EngineConfig;
pub use engine::{load_engine, EngineHandle, LazyEngine};
pub use ollama::OllamaEngine;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Engine could not be used (failed to load, lock poisoned)
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A recorded invocation, for assertions in tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Prompt as sent
    pub prompt: String,
    /// Parameters as sent
    pub params: InvocationParams,
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<Result<String, String>>,
    calls: Vec<RecordedCall>,
}

/// Mock engine for deterministic testing
///
/// Replies are taken from a script in call order; once the script is
/// exhausted every call gets the default response. No network calls are made.
///
/// # Examples
///
/// ```
/// use cardsmith_llm::MockEngine;
/// use cardsmith_domain::InvocationParams;
/// use cardsmith_domain::traits::InferenceEngine;
///
/// let engine = MockEngine::new("default")
///     .then_reply("first")
///     .then_fail("engine crashed");
/// let params = InvocationParams::default();
/// assert_eq!(engine.invoke("a", &params).unwrap(), "first");
/// assert!(engine.invoke("b", &params).is_err());
/// assert_eq!(engine.invoke("c", &params).unwrap(), "default");
/// ```
#[derive(Debug, Clone)]
pub struct MockEngine {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    /// Create a new MockEngine with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Queue a successful reply
    pub fn then_reply(self, response: impl Into<String>) -> Self {
        self.state().script.push_back(Ok(response.into()));
        self
    }

    /// Queue a failing invocation
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.state().script.push_back(Err(message.into()));
        self
    }

    /// Get the number of times invoke was called
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// All invocations so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not wedge the other handles
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl InferenceEngine for MockEngine {
    type Error = LlmError;

    fn invoke(&self, prompt: &str, params: &InvocationParams) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.calls.push(RecordedCall {
            prompt: prompt.to_string(),
            params: params.clone(),
        });

        match state.script.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_engine_default() {
        let engine = MockEngine::new("Test response");
        let result = engine.invoke("any prompt", &InvocationParams::default());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_engine_script_order() {
        let engine = MockEngine::new("fallback")
            .then_reply("one")
            .then_reply("two");
        let params = InvocationParams::default();

        assert_eq!(engine.invoke("a", &params).unwrap(), "one");
        assert_eq!(engine.invoke("b", &params).unwrap(), "two");
        assert_eq!(engine.invoke("c", &params).unwrap(), "fallback");
    }

    #[test]
    fn test_mock_engine_error() {
        let engine = MockEngine::default().then_fail("boom");
        let result = engine.invoke("bad prompt", &InvocationParams::default());
        assert!(matches!(result, Err(LlmError::Other(msg)) if msg == "boom"));
    }

    #[test]
    fn test_mock_engine_records_calls() {
        let engine = MockEngine::default();
        let params = InvocationParams {
            max_tokens: 12,
            stop_sequences: vec!["<|end|>".to_string()],
        };
        engine.invoke("prompt1", &params).unwrap();

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "prompt1");
        assert_eq!(calls[0].params, params);
    }

    #[test]
    fn test_mock_engine_clone_shares_state() {
        let engine1 = MockEngine::new("test");
        let engine2 = engine1.clone();

        engine1.invoke("test", &InvocationParams::default()).unwrap();

        assert_eq!(engine1.call_count(), 1);
        assert_eq!(engine2.call_count(), 1);
    }
}

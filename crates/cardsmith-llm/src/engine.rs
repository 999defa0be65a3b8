//! Shared engine handles
//!
//! Model weights are expensive to load, so an engine is built once and
//! reused for every chunk. [`EngineHandle`] makes that instance shareable and
//! serializes invocations behind a mutex; [`LazyEngine`] defers construction
//! until the first invocation.

use crate::config::EngineConfig;
use crate::ollama::OllamaEngine;
use crate::LlmError;
use cardsmith_domain::traits::InferenceEngine;
use cardsmith_domain::InvocationParams;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::info;

/// Load the default (Ollama) engine
///
/// Call once per process and reuse the returned handle.
pub fn load_engine(config: &EngineConfig) -> Result<EngineHandle<OllamaEngine>, LlmError> {
    info!(
        "Loading engine: model '{}' at {} (ctx {}, threads {}, gpu layers {})",
        config.model, config.endpoint, config.context_size, config.thread_count, config.gpu_layer_count
    );
    let engine = OllamaEngine::new(config.clone())?;
    Ok(EngineHandle::new(engine))
}

/// Cloneable handle to a single engine instance
///
/// At most one invocation runs at a time.
pub struct EngineHandle<E> {
    inner: Arc<Mutex<E>>,
    model: Arc<str>,
}

impl<E> Clone for EngineHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            model: Arc::clone(&self.model),
        }
    }
}

impl<E> EngineHandle<E>
where
    E: InferenceEngine<Error = LlmError>,
{
    /// Wrap an engine for shared use
    pub fn new(engine: E) -> Self {
        let model: Arc<str> = Arc::from(engine.model_name());
        Self {
            inner: Arc::new(Mutex::new(engine)),
            model,
        }
    }

    /// Run a closure with exclusive access to the engine
    pub fn with_engine<T>(&self, f: impl FnOnce(&E) -> T) -> Result<T, LlmError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| LlmError::Unavailable("engine lock poisoned".to_string()))?;
        Ok(f(&guard))
    }
}

impl<E> InferenceEngine for EngineHandle<E>
where
    E: InferenceEngine<Error = LlmError>,
{
    type Error = LlmError;

    fn invoke(&self, prompt: &str, params: &InvocationParams) -> Result<String, Self::Error> {
        self.with_engine(|engine| engine.invoke(prompt, params))?
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

type EngineInit<E> = Box<dyn Fn() -> Result<E, LlmError> + Send + Sync>;

/// Engine constructed on first use and kept for the owner's lifetime
///
/// Concurrent first calls construct the engine only once. A failed
/// construction is not cached; the next call tries again.
pub struct LazyEngine<E> {
    cell: OnceLock<EngineHandle<E>>,
    init: EngineInit<E>,
    init_lock: Mutex<()>,
    model: String,
}

impl<E> LazyEngine<E>
where
    E: InferenceEngine<Error = LlmError>,
{
    /// Create a lazy engine from a constructor
    pub fn new(
        model: impl Into<String>,
        init: impl Fn() -> Result<E, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            cell: OnceLock::new(),
            init: Box::new(init),
            init_lock: Mutex::new(()),
            model: model.into(),
        }
    }

    /// Get the handle, constructing the engine if needed
    pub fn handle(&self) -> Result<&EngineHandle<E>, LlmError> {
        if let Some(handle) = self.cell.get() {
            return Ok(handle);
        }

        let _guard = self
            .init_lock
            .lock()
            .map_err(|_| LlmError::Unavailable("engine init lock poisoned".to_string()))?;

        if let Some(handle) = self.cell.get() {
            return Ok(handle);
        }

        let engine = (self.init)()?;
        Ok(self.cell.get_or_init(|| EngineHandle::new(engine)))
    }
}

impl LazyEngine<OllamaEngine> {
    /// Lazily load an Ollama engine, warming the model on first use
    pub fn ollama(config: EngineConfig) -> Self {
        let model = config.model.clone();
        Self::new(model, move || {
            let engine = OllamaEngine::new(config.clone())?;
            engine.warm_up()?;
            Ok(engine)
        })
    }
}

impl<E> InferenceEngine for LazyEngine<E>
where
    E: InferenceEngine<Error = LlmError>,
{
    type Error = LlmError;

    fn invoke(&self, prompt: &str, params: &InvocationParams) -> Result<String, Self::Error> {
        self.handle()?.invoke(prompt, params)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

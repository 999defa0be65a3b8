//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] cardsmith_store::StoreError),

    /// Generation error
    #[error("{0}")]
    Generator(#[from] cardsmith_generator::GeneratorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not permitted
    #[error("Operation not permitted: {0}")]
    NotPermitted(String),

    /// Wrong username or password
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// No session user
    #[error("Not logged in. Use 'login' command first.")]
    NotLoggedIn,

    /// Deck does not exist
    #[error("Deck not found: {0}")]
    DeckNotFound(String),
}

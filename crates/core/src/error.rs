//! Error types for recap.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! backend, prompt and pipeline failures. Several variants are recoverable
//! signals rather than fatal errors: callers inside the pipeline fold them
//! into degraded output instead of propagating them.

use thiserror::Error;

/// Unified error type for recap.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic: errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generative backend failure (service error, transport failure, bad status)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Generative backend refused the request because of quota/rate limits
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Backend output could not be parsed as JSON, even after repair
    #[error("Malformed backend JSON: {0}")]
    MalformedJson(String),

    /// Sentence/word tokenizer could not process the input
    #[error("Tokenization error: {0}")]
    Tokenization(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Pipeline-stage errors
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// The caller's cancellation token was triggered
    #[error("Operation cancelled")]
    Cancelled,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an error, used by retry policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    MalformedJson,
    Service,
    Cancelled,
    Other,
}

impl AppError {
    /// Classify this error for retry decisions.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::RateLimited(_) => ErrorKind::RateLimited,
            AppError::MalformedJson(_) => ErrorKind::MalformedJson,
            AppError::Llm(_) => ErrorKind::Service,
            AppError::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Other,
        }
    }

    /// Whether this error is a quota/rate-limit rejection.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::RateLimited(_))
    }

    /// Whether this error is a cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

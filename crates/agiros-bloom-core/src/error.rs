//! Error types for the core library

use thiserror::Error;

/// Core error type for agiros-bloom operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dependency condition could not be evaluated
    #[error("Invalid condition '{condition}': {reason}")]
    InvalidCondition { condition: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Parse error
    #[error("Parse error: {message}")]
    ParseError { message: String },
}

/// Result type alias for agiros-bloom operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid condition error
    pub fn invalid_condition(condition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCondition { condition: condition.into(), reason: reason.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError { message: message.into() }
    }
}

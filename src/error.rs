// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for axe-assert

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for axe-assert
#[derive(Error, Debug)]
pub enum Error {
    /// A markup string that contains no element tags
    #[error("html parameter (\"{0}\") has no elements")]
    InvalidInput(String),

    /// Neither an element nor a string
    #[error("html parameter should be an HTML string or an HTML element")]
    UnsupportedInput,

    /// The engine result has no `violations` list
    #[error(
        "Unexpected aXe results object. No violations property found.\n\
         Did you change the `reporter` in your aXe configuration?"
    )]
    MalformedResult,

    /// Error reported by the audit engine, passed through unchanged
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The engine dropped its completion handle without reporting
    #[error("audit engine finished without reporting a result")]
    EngineAbandoned,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque failure raised by an audit engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_names_offending_string() {
        let err = Error::InvalidInput("not html".to_string());
        assert_eq!(err.to_string(), "html parameter (\"not html\") has no elements");
    }

    #[test]
    fn test_malformed_result_mentions_reporter() {
        let msg = Error::MalformedResult.to_string();
        assert!(msg.contains("No violations property found"));
        assert!(msg.contains("`reporter`"));
    }

    #[test]
    fn test_engine_error_is_transparent() {
        let err: Error = EngineError::new("axe is already running").into();
        assert_eq!(err.to_string(), "axe is already running");
    }
}

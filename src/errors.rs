//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the citation network engine, providing
//! structured error types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from various system components
//! - **Output**: Structured error types with context and error chains
//! - **Error Categories**: Configuration, Patterns, API, Generic
//!
//! ## Key Features
//! - Hierarchical error types with detailed context
//! - Automatic error conversion and chaining
//! - User-friendly error messages for API responses
//! - Structured logging integration
//!
//! Note that the extraction and network-building core never surfaces these to
//! callers: heuristic failures degrade to `unknown`/empty results. Errors here
//! cover configuration, pattern compilation, and the server surface.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, CitationError>;

/// Error types for the citation network engine
#[derive(Debug, Error)]
pub enum CitationError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// A regex in the pattern library failed to compile
    #[error("Invalid pattern '{pattern}': {details}")]
    PatternCompilation { pattern: String, details: String },

    /// Invalid API request payloads
    #[error("Invalid API request: {details}")]
    InvalidApiRequest { details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CitationError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            CitationError::Config { .. }
            | CitationError::ValidationFailed { .. }
            | CitationError::Toml(_) => "configuration",
            CitationError::PatternCompilation { .. } => "patterns",
            CitationError::InvalidApiRequest { .. } => "api",
            CitationError::Internal { .. }
            | CitationError::Json(_)
            | CitationError::Io(_) => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category() {
        let err = CitationError::Config {
            message: "bad".to_string(),
        };
        assert_eq!(err.category(), "configuration");

        let err = CitationError::PatternCompilation {
            pattern: "(".to_string(),
            details: "unclosed group".to_string(),
        };
        assert_eq!(err.category(), "patterns");
    }

    #[test]
    fn test_display_includes_context() {
        let err = CitationError::ValidationFailed {
            field: "server.port".to_string(),
            reason: "cannot be zero".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("server.port"));
        assert!(rendered.contains("cannot be zero"));
    }
}

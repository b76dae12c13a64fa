//! Error types for shape-mock
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.

use axum::http::StatusCode;
use thiserror::Error;

/// The main error type for shape-mock
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Inference Errors
    // ============================================================================
    #[error("Unclassifiable value at '{path}'")]
    UnclassifiableType { path: String },

    #[error("Nesting depth {depth} exceeded at '{path}'")]
    DepthLimitExceeded { depth: usize, path: String },

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an unclassifiable type error
    pub fn unclassifiable(path: impl Into<String>) -> Self {
        Self::UnclassifiableType { path: path.into() }
    }

    /// Create a depth limit error
    pub fn depth_exceeded(depth: usize, path: impl Into<String>) -> Self {
        Self::DepthLimitExceeded {
            depth,
            path: path.into(),
        }
    }

    /// Create an invalid schema error
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the inferred input rather than the server
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::UnclassifiableType { .. }
                | Error::DepthLimitExceeded { .. }
                | Error::InvalidRequest { .. }
                | Error::JsonParse(_)
        )
    }

    /// HTTP status code used when this error reaches the transport
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::UnclassifiableType { .. } | Error::DepthLimitExceeded { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Error::InvalidRequest { .. } | Error::JsonParse(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias for shape-mock
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

//! Error types for Rebrickable API access
//!
//! Every layer of the client (request builder, endpoint functions, mapper and
//! facade) reports failures through [`RebrickError`].

use thiserror::Error;

/// Rebrickable client error types
#[derive(Debug, Error)]
pub enum RebrickError {
    #[error("API key not specified, set one in the client settings")]
    MissingApiKey,

    #[error("User token not specified, log in or set one in the client settings")]
    MissingUserToken,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid page cursor: {0}")]
    InvalidCursor(String),

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RebrickError {
    /// Whether the error came from the transport or the remote service.
    ///
    /// Only these errors are swallowed by silent mode; missing credentials and
    /// malformed payloads always reach the caller.
    pub fn is_http(&self) -> bool {
        matches!(self, RebrickError::Http(_) | RebrickError::ApiError { .. })
    }

    /// HTTP status code returned by the service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RebrickError::ApiError { status, .. } => Some(*status),
            RebrickError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RebrickError {
    fn from(err: serde_json::Error) -> Self {
        RebrickError::ParseError(err.to_string())
    }
}

/// Result type for Rebrickable operations
pub type RebrickResult<T> = Result<T, RebrickError>;

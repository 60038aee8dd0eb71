//! Error types

use thiserror::Error;

/// Why fetching the events failed. Both kinds are recoverable by retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request could not be sent, timed out, or the response was not valid JSON
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },
}

impl FetchError {
    pub fn network<S: ToString>(message: S) -> Self {
        Self::Network { message: message.to_string() }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status } => Some(*status),
            FetchError::Network { .. } => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::HttpStatus { status: status.as_u16() },
            None => FetchError::network(err),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::network(format!("invalid JSON body: {}", err))
    }
}

/// Invalid library settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Unsupported endpoint scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

//! Error handling for the ServiHogar Rust client

use std::fmt;
use thiserror::Error;

/// Unified error type for the ServiHogar Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors (retryable by the caller)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Login rejected or no token returned
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The bearer token payload could not be decoded
    #[error("Token decode error: {0}")]
    TokenDecode(String),

    /// The session's expiry has passed
    #[error("Session expired")]
    SessionExpired,

    /// No client profile in the directory matches the session identity
    #[error("No client profile matches {0}")]
    ClientProfileNotFound(String),

    /// Required input is missing or malformed; correct it and retry
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a new authentication error
    pub fn authentication<T: fmt::Display>(msg: T) -> Self {
        Error::Authentication(msg.to_string())
    }

    /// Create a new token decode error
    pub fn token_decode<T: fmt::Display>(msg: T) -> Self {
        Error::TokenDecode(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// True for transport failures the user may simply retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

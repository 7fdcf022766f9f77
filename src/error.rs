//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. Adapter
//! boundaries collapse these into [`crate::models::GenerationResult`].

use thiserror::Error;

/// Message used when an error carries no text of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport failure before a structured body was available.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request with a non-2xx status.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// HTTP succeeded but the expected candidate/content/part was missing.
    #[error("{0}")]
    Schema(String),

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Message presented to callers once the error crosses an adapter boundary.
    pub fn failure_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Whether another attempt of the same request could succeed.
    ///
    /// Only transport failures, rate limiting and server-side errors qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::Provider { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

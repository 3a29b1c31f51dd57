//! Client error types

use shared::error::{ErrorKind, ValidationError};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally; nothing was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Server answered with a non-success status
    #[error("Request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// Bearer token was refused on an authenticated call
    #[error("Authentication expired")]
    AuthExpired,

    /// Card widget could not produce a payment method
    #[error("Card payment failed: {0}")]
    Payment(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Session storage failure
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Where this error sits in the user-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Rejected { .. } | Self::Payment(_) => ErrorKind::Rejected,
            Self::AuthExpired => ErrorKind::AuthExpired,
            Self::Http(_)
            | Self::InvalidResponse(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Serialization(_) => ErrorKind::Transport,
        }
    }

    /// Text to show inline: the server's message when it sent one,
    /// the validation detail for local errors, a generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Rejected {
                message: Some(m), ..
            } => m.clone(),
            Self::Payment(m) if !m.trim().is_empty() => m.clone(),
            other => other.kind().fallback_message().to_string(),
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    pub(crate) fn not_allowed(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::NotAllowed(msg.into()))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

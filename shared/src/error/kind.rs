//! Error kind classification

use serde::{Deserialize, Serialize};

/// Generic text shown when the server gives no usable message.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// Classification of a failure by how the user should experience it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Client-detected problem with user input (missing field, bad value)
    Validation,
    /// Server answered with a non-success status and maybe a message
    Rejected,
    /// Request never completed or the body could not be decoded
    Transport,
    /// Bearer token no longer accepted; the user must log in again
    AuthExpired,
}

impl ErrorKind {
    /// Get the string name for this kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Rejected => "rejected",
            Self::Transport => "transport",
            Self::AuthExpired => "auth_expired",
        }
    }

    /// Whether the error is shown inline next to the active form.
    ///
    /// Auth expiry is routed to the login screen instead.
    pub fn is_inline(&self) -> bool {
        !matches!(self, Self::AuthExpired)
    }

    /// Text used when no server message is available
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please fill in all required fields.",
            Self::AuthExpired => "Your session has expired. Please log in again.",
            Self::Rejected | Self::Transport => FALLBACK_MESSAGE,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

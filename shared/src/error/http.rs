//! HTTP status code mapping for error kinds

use super::kind::ErrorKind;
use http::StatusCode;

impl ErrorKind {
    /// Classify a non-success HTTP status.
    ///
    /// `authenticated` is whether the request carried a bearer token: only
    /// then does 401/403 mean the session expired.
    pub fn from_status(status: StatusCode, authenticated: bool) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN if authenticated => Self::AuthExpired,
            _ => Self::Rejected,
        }
    }
}

//! Error taxonomy for the Doorstep client
//!
//! Every failure a user can run into falls in exactly one [`ErrorKind`]:
//!
//! - `Validation`: detected locally, never reaches the network
//! - `Rejected`: the server answered with a non-success status
//! - `Transport`: the request failed or the body was not the expected JSON
//! - `AuthExpired`: 401/403 on a call that carried a bearer token
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiErrorBody, ErrorKind};
//! use shared::http::StatusCode;
//!
//! let kind = ErrorKind::from_status(StatusCode::UNAUTHORIZED, true);
//! assert_eq!(kind, ErrorKind::AuthExpired);
//!
//! let body = ApiErrorBody::parse(r#"{"message":"Coupon expired"}"#).unwrap();
//! assert_eq!(body.message(), Some("Coupon expired"));
//! ```

mod http;
mod kind;
mod types;

pub use kind::ErrorKind;
pub use types::{ApiErrorBody, ValidationError};

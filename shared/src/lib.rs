//! Shared types for the Doorstep marketplace client
//!
//! Wire types exchanged with the marketplace REST API, the error taxonomy
//! used to classify failures, and the keys of the persisted client session.

pub mod error;
pub mod models;
pub mod storage_keys;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiErrorBody, ErrorKind, ValidationError};
pub use models::Price;

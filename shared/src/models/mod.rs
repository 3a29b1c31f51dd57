//! Data models
//!
//! Wire types of the marketplace REST API. Field names follow the server's
//! JSON exactly; where the server is inconsistent (`zoneId`, `Total`,
//! `addOns`) the serde attributes say so.

pub mod address;
pub mod auth;
pub mod booking;
pub mod customer;
pub mod order;
pub mod payment;
pub mod price;
pub mod quote;
pub mod service;
pub mod zone;

// Re-exports
pub use address::*;
pub use auth::*;
pub use booking::*;
pub use customer::*;
pub use order::*;
pub use payment::*;
pub use price::*;
pub use quote::*;
pub use service::*;
pub use zone::*;

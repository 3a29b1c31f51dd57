//! Doorstep Client - headless client for the local-services marketplace
//!
//! Drives the booking flow against the marketplace REST API: catalog
//! browsing, the booking wizard with its availability and pricing
//! reconcilers, checkout, and quote negotiation. State a UI would render is
//! exposed by the controllers; navigation is returned as [`Navigation`].

pub mod account;
pub mod api;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod details;
pub mod error;
pub mod grouping;
pub mod http;
pub mod latest;
pub mod logger;
pub mod navigation;
pub mod pricing;
pub mod quote;
pub mod selection;
pub mod store;
pub mod wizard;

pub use api::MarketplaceApi;
pub use booking::BookingSession;
pub use checkout::{CardCollector, CheckoutSession};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkHttpClient;
pub use latest::LatestWins;
pub use navigation::Navigation;
pub use selection::SelectionStore;
pub use store::{FileStore, MemoryStore, SessionStore, SessionStoreExt, SharedStore};
pub use wizard::{BookingDraft, BookingWizard, Step};

// Re-export shared types for convenience
pub use shared::models;
pub use shared::{ErrorKind, ValidationError};

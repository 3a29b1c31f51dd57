//! Quote / Bid Model
//!
//! Every state on these types is computed by the server. In particular the
//! two capability flags on [`Bid`] are never derived on the client.

use super::price::Price;
use serde::{Deserialize, Serialize};

/// Negotiation state of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Open,
    BidSelected,
    #[serde(alias = "completed")]
    Complete,
    #[serde(other)]
    Unknown,
}

/// Customer-authored sourcing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: QuoteStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Vendor offer against a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    pub amount: Price,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub show_confirm_button: bool,
    #[serde(default)]
    pub show_chat_button: bool,
    #[serde(default)]
    pub is_selected: bool,
}

/// Quote list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotesResponse {
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

/// Quote detail response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: Quote,
}

/// Bid list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BidsResponse {
    #[serde(default)]
    pub bids: Vec<Bid>,
}

/// Confirm bid payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmBidRequest {
    pub bid_id: i64,
}

//! Quote and bid negotiation
//!
//! Status and the per-bid capability flags are whatever the server last
//! said. Confirming a bid is one POST followed by a full re-fetch, since the
//! flags of every sibling bid may change with it.

use futures::try_join;
use shared::models::{Bid, Quote, QuoteStatus};

use crate::api::QuoteApi;
use crate::error::{ClientError, ClientResult};

/// The customer's quote list
#[derive(Debug, Clone, Default)]
pub struct QuoteBoard {
    quotes: Vec<Quote>,
    error: Option<String>,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load<A: QuoteApi + ?Sized>(&mut self, api: &A) -> ClientResult<()> {
        match api.quotes().await {
            Ok(quotes) => {
                self.quotes = quotes;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

/// One quote with its bids
#[derive(Debug, Clone)]
pub struct QuoteNegotiation {
    quote: Quote,
    bids: Vec<Bid>,
    confirming: bool,
    error: Option<String>,
}

impl QuoteNegotiation {
    /// Fetch a quote and its bids
    pub async fn open<A: QuoteApi + ?Sized>(api: &A, quote_id: i64) -> ClientResult<Self> {
        let (quote, bids) = try_join!(api.quote(quote_id), api.bids(quote_id))?;
        Ok(Self {
            quote,
            bids,
            confirming: false,
            error: None,
        })
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn status(&self) -> QuoteStatus {
        self.quote.status
    }

    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    fn bid(&self, bid_id: i64) -> Option<&Bid> {
        self.bids.iter().find(|b| b.id == bid_id)
    }

    /// The server lets this bid be confirmed
    pub fn can_confirm(&self, bid_id: i64) -> bool {
        self.bid(bid_id).is_some_and(|b| b.show_confirm_button)
    }

    /// The server offers a chat with this bid's vendor
    pub fn can_chat(&self, bid_id: i64) -> bool {
        self.bid(bid_id).is_some_and(|b| b.show_chat_button)
    }

    /// The bid the server reports as selected
    pub fn selected_bid(&self) -> Option<&Bid> {
        let mut selected = self.bids.iter().filter(|b| b.is_selected);
        let first = selected.next();
        if selected.next().is_some() {
            tracing::warn!(quote_id = self.quote.id, "Server reports several selected bids");
        }
        first
    }

    /// Re-fetch the quote and its bids
    pub async fn refresh<A: QuoteApi + ?Sized>(&mut self, api: &A) -> ClientResult<()> {
        let id = self.quote.id;
        match try_join!(api.quote(id), api.bids(id)) {
            Ok((quote, bids)) => {
                self.quote = quote;
                self.bids = bids;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Confirm `bid_id`, then reload everything from the server
    pub async fn confirm_bid<A: QuoteApi + ?Sized>(&mut self, api: &A, bid_id: i64) -> ClientResult<()> {
        if self.confirming {
            return Err(ClientError::not_allowed("Confirmation already in progress"));
        }
        if !self.can_confirm(bid_id) {
            return Err(ClientError::not_allowed("This bid cannot be confirmed"));
        }

        self.confirming = true;
        self.error = None;
        let result = api.confirm_bid(self.quote.id, bid_id).await;
        self.confirming = false;

        if let Err(e) = result {
            tracing::warn!(quote_id = self.quote.id, bid_id, error = %e, "Bid confirmation failed");
            self.error = Some(e.user_message());
            return Err(e);
        }
        tracing::info!(quote_id = self.quote.id, bid_id, "Bid confirmed");
        self.refresh(api).await
    }
}

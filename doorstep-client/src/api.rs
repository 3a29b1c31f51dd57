//! Marketplace REST contract
//!
//! One trait per concern so each controller depends only on the endpoints it
//! calls, and tests can fake exactly that surface. [`MarketplaceApi`] is the
//! union, implemented by [`crate::http::NetworkHttpClient`].

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use shared::models::{
    Address, AddressFields, AuthoritativeTotal, Bid, CapturePaymentRequest, LoginRequest,
    LoginResponse, Order, OrderIds, OrderUpdateRequest, PaymentIntentRequest,
    PaymentIntentResponse, PriceBreakdown, Quote, SearchQuery, Service, ServiceGroup, SlotOption,
    Zone,
};

use crate::error::ClientResult;
use crate::wizard::BookingDraft;

// ============================================================================
// Request bodies that carry the booking draft
// ============================================================================

/// Ask the server how the selected services split into groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupsRequest {
    pub service_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
}

/// Available (slot, staff) combinations of one group on one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotsRequest {
    pub service_ids: Vec<i64>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
}

/// Recompute the price breakdown of the full draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsRequest {
    #[serde(rename = "bookingData")]
    pub booking_data: BookingDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Validate and apply a coupon code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouponRequest {
    pub coupon_code: String,
    #[serde(rename = "bookingData", skip_serializing_if = "Option::is_none")]
    pub booking_data: Option<BookingDraft>,
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
}

/// Turn the reviewed draft into orders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateBookingRequest {
    #[serde(rename = "bookingData")]
    pub booking_data: BookingDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Orders and their authoritative total, as listed for checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrders {
    pub orders: Vec<Order>,
    pub total: AuthoritativeTotal,
}

// ============================================================================
// Endpoint traits
// ============================================================================

/// Login, zones and saved addresses
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse>;
    async fn zones(&self) -> ClientResult<Vec<Zone>>;
    async fn addresses(&self) -> ClientResult<Vec<Address>>;
    async fn save_address(&self, address: &AddressFields) -> ClientResult<()>;
    async fn delete_address(&self, address_id: i64) -> ClientResult<()>;
}

/// Service discovery
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<Service>>;
    async fn service(&self, service_id: i64) -> ClientResult<Service>;
}

/// Grouping, availability, pricing and booking submission
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn service_groups(&self, request: &GroupsRequest) -> ClientResult<Vec<ServiceGroup>>;
    async fn available_slots(&self, request: &SlotsRequest) -> ClientResult<Vec<SlotOption>>;
    async fn booking_totals(&self, request: &TotalsRequest) -> ClientResult<PriceBreakdown>;
    /// `Ok` only on a 200; every other status is the rejection
    async fn apply_coupon(&self, request: &CouponRequest) -> ClientResult<()>;
    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<OrderIds>;
}

/// Payment handoff
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    async fn orders(&self, ids: &OrderIds, zone_id: Option<i64>) -> ClientResult<CheckoutOrders>;
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> ClientResult<PaymentIntentResponse>;
    async fn capture_payment(&self, request: &CapturePaymentRequest) -> ClientResult<()>;
    async fn confirm_cod(&self, request: &OrderUpdateRequest) -> ClientResult<()>;
}

/// Quote and bid negotiation
#[async_trait]
pub trait QuoteApi: Send + Sync {
    async fn quotes(&self) -> ClientResult<Vec<Quote>>;
    async fn quote(&self, quote_id: i64) -> ClientResult<Quote>;
    async fn bids(&self, quote_id: i64) -> ClientResult<Vec<Bid>>;
    async fn confirm_bid(&self, quote_id: i64, bid_id: i64) -> ClientResult<()>;
}

/// The whole marketplace surface
pub trait MarketplaceApi: AccountApi + CatalogApi + BookingApi + CheckoutApi + QuoteApi {}

impl<T> MarketplaceApi for T where T: AccountApi + CatalogApi + BookingApi + CheckoutApi + QuoteApi {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coupon_request_wire_names() {
        let req = CouponRequest {
            coupon_code: "SAVE10".into(),
            booking_data: Some(BookingDraft::default()),
            user_id: None,
            zone_id: Some(3),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["coupon_code"], "SAVE10");
        assert!(json.get("bookingData").is_some());
        assert!(json["user_id"].is_null());
        assert_eq!(json["zone_id"], 3);
    }

    #[test]
    fn test_slots_request_date_format() {
        let req = SlotsRequest {
            service_ids: vec![10],
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            zone_id: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["date"], "2026-10-20");
        assert!(json.get("zone_id").is_none());
    }
}

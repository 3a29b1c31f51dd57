//! HTTP client - network communication with the marketplace API

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiErrorBody, ErrorKind};
use shared::models::{
    Address, AddressFields, AddressesResponse, Bid, BidsResponse, BookingCreated,
    CapturePaymentRequest, ConfirmBidRequest, DeleteAddressRequest, GroupsResponse, LoginRequest,
    LoginResponse, OrderIds, OrderUpdateRequest, OrdersResponse, PaymentIntentRequest,
    PaymentIntentResponse, PriceBreakdown, Quote, QuoteResponse, QuotesResponse, SearchQuery,
    SearchResponse, Service, ServiceGroup, SlotOption, SlotsResponse, Zone, ZonesResponse,
};
use shared::storage_keys;

use crate::api::{
    AccountApi, BookingApi, CatalogApi, CheckoutApi, CheckoutOrders, CouponRequest,
    CreateBookingRequest, GroupsRequest, QuoteApi, SlotsRequest, TotalsRequest,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::store::{SessionStoreExt, SharedStore};

/// Query of the checkout order listing
#[derive(Serialize)]
struct OrdersQuery<'a> {
    orders: &'a OrderIds,
    #[serde(rename = "zoneId", skip_serializing_if = "Option::is_none")]
    zone_id: Option<i64>,
}

/// Network HTTP client
///
/// The bearer token is read from the session store on every request, so a
/// login or an expiry handled elsewhere takes effect immediately.
#[derive(Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    session: Option<SharedStore>,
}

impl std::fmt::Debug for NetworkHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkHttpClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session.is_some())
            .finish()
    }
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Attach the session store that holds the bearer token
    pub fn with_session(mut self, store: SharedStore) -> Self {
        self.session = Some(store);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn token(&self) -> Option<String> {
        self.session
            .as_ref()
            .and_then(|s| s.get_json::<String>(storage_keys::TOKEN))
            .filter(|t| !t.is_empty())
    }

    /// Send a request with the bearer token attached when there is one
    async fn send(&self, req: reqwest::RequestBuilder) -> ClientResult<String> {
        let (_, text) = self.send_with_status(req).await?;
        Ok(text)
    }

    async fn send_with_status(
        &self,
        req: reqwest::RequestBuilder,
    ) -> ClientResult<(StatusCode, String)> {
        let token = self.token();
        let req = match &token {
            Some(t) => req.bearer_auth(t),
            None => req,
        };
        let response = req.send().await?;
        self.handle_response(response, token.is_some()).await
    }

    /// Map a non-success status to the error taxonomy; returns the status
    /// and body text of a success
    async fn handle_response(
        &self,
        response: reqwest::Response,
        authenticated: bool,
    ) -> ClientResult<(StatusCode, String)> {
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;
        if status.is_success() {
            return Ok((status, text));
        }

        match ErrorKind::from_status(status, authenticated) {
            ErrorKind::AuthExpired => {
                tracing::warn!(path = %url, status = status.as_u16(), "Bearer token refused");
                Err(ClientError::AuthExpired)
            }
            _ => {
                let message = ApiErrorBody::parse(&text)
                    .and_then(|body| body.message().map(str::to_string));
                tracing::debug!(path = %url, status = status.as_u16(), ?message, "Request rejected");
                Err(ClientError::Rejected {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    fn decode<T: DeserializeOwned>(text: &str) -> ClientResult<T> {
        serde_json::from_str(text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let text = self.send(self.client.get(self.url(path))).await?;
        Self::decode(&text)
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let text = self
            .send(self.client.get(self.url(path)).query(query))
            .await?;
        Self::decode(&text)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.send(self.client.post(self.url(path)).json(body)).await?;
        Self::decode(&text)
    }

    /// POST where only the status matters; any 2xx body is accepted
    pub async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        self.send(self.client.post(self.url(path)).json(body)).await?;
        Ok(())
    }

    /// POST that succeeds on exactly 200 OK; other 2xx answers are rejections
    pub async fn post_ok<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let (status, text) = self
            .send_with_status(self.client.post(self.url(path)).json(body))
            .await?;
        if status == StatusCode::OK {
            return Ok(());
        }
        let message =
            ApiErrorBody::parse(&text).and_then(|body| body.message().map(str::to_string));
        tracing::debug!(path, status = status.as_u16(), ?message, "Request not accepted");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AccountApi for NetworkHttpClient {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.post("/api/login", request).await
    }

    async fn zones(&self) -> ClientResult<Vec<Zone>> {
        let resp: ZonesResponse = self.get("/api/zones").await?;
        Ok(resp.zones)
    }

    async fn addresses(&self) -> ClientResult<Vec<Address>> {
        let resp: AddressesResponse = self.get("/api/addresses").await?;
        Ok(resp.addresses)
    }

    async fn save_address(&self, address: &AddressFields) -> ClientResult<()> {
        self.post_ack("/api/saveaddress", address).await
    }

    async fn delete_address(&self, address_id: i64) -> ClientResult<()> {
        self.post_ack("/api/deleteaddress", &DeleteAddressRequest { address_id })
            .await
    }
}

#[async_trait]
impl CatalogApi for NetworkHttpClient {
    async fn search(&self, query: &SearchQuery) -> ClientResult<Vec<Service>> {
        let resp: SearchResponse = self.get_query("/api/search", query).await?;
        Ok(resp.services)
    }

    async fn service(&self, service_id: i64) -> ClientResult<Service> {
        self.get(&format!("/api/services/{service_id}")).await
    }
}

#[async_trait]
impl BookingApi for NetworkHttpClient {
    async fn service_groups(&self, request: &GroupsRequest) -> ClientResult<Vec<ServiceGroup>> {
        let resp: GroupsResponse = self.post("/api/booking/groups", request).await?;
        Ok(resp.groups)
    }

    async fn available_slots(&self, request: &SlotsRequest) -> ClientResult<Vec<SlotOption>> {
        let resp: SlotsResponse = self.post("/api/booking/slots", request).await?;
        Ok(resp.slots)
    }

    async fn booking_totals(&self, request: &TotalsRequest) -> ClientResult<PriceBreakdown> {
        self.post("/api/booking/totals", request).await
    }

    async fn apply_coupon(&self, request: &CouponRequest) -> ClientResult<()> {
        self.post_ok("/api/apply-coupon", request).await
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<OrderIds> {
        let resp: BookingCreated = self.post("/api/booking", request).await?;
        let ids = resp.order_ids();
        if ids.is_empty() {
            return Err(ClientError::InvalidResponse(
                "booking created no orders".into(),
            ));
        }
        Ok(ids)
    }
}

#[async_trait]
impl CheckoutApi for NetworkHttpClient {
    async fn orders(&self, ids: &OrderIds, zone_id: Option<i64>) -> ClientResult<CheckoutOrders> {
        let query = OrdersQuery {
            orders: ids,
            zone_id,
        };
        let resp: OrdersResponse = self.get_query("/api/getorders", &query).await?;
        Ok(CheckoutOrders {
            orders: resp.orders,
            total: resp.total,
        })
    }

    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> ClientResult<PaymentIntentResponse> {
        self.post("/api/stripe/payment-intent", request).await
    }

    async fn capture_payment(&self, request: &CapturePaymentRequest) -> ClientResult<()> {
        self.post_ack("/api/stripe/payment", request).await
    }

    async fn confirm_cod(&self, request: &OrderUpdateRequest) -> ClientResult<()> {
        self.post_ack("/api/orderupdate", request).await
    }
}

#[async_trait]
impl QuoteApi for NetworkHttpClient {
    async fn quotes(&self) -> ClientResult<Vec<Quote>> {
        let resp: QuotesResponse = self.get("/api/quotes").await?;
        Ok(resp.quotes)
    }

    async fn quote(&self, quote_id: i64) -> ClientResult<Quote> {
        let resp: QuoteResponse = self.get(&format!("/api/quote/{quote_id}")).await?;
        Ok(resp.quote)
    }

    async fn bids(&self, quote_id: i64) -> ClientResult<Vec<Bid>> {
        let resp: BidsResponse = self.get(&format!("/api/quote/{quote_id}/bids")).await?;
        Ok(resp.bids)
    }

    async fn confirm_bid(&self, quote_id: i64, bid_id: i64) -> ClientResult<()> {
        self.post_ack(
            &format!("/api/quote/{quote_id}/confirm-bid"),
            &ConfirmBidRequest { bid_id },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SessionStoreExt};
    use std::sync::Arc;

    #[test]
    fn test_url_joining() {
        let client = NetworkHttpClient::new(&ClientConfig::new("http://api.test/")).unwrap();
        assert_eq!(client.base_url(), "http://api.test");
        assert_eq!(client.url("/api/zones"), "http://api.test/api/zones");
        assert_eq!(client.url("api/zones"), "http://api.test/api/zones");
    }

    #[test]
    fn test_token_comes_from_session() {
        let store = Arc::new(MemoryStore::new());
        let client = NetworkHttpClient::new(&ClientConfig::default())
            .unwrap()
            .with_session(store.clone());
        assert_eq!(client.token(), None);

        store.set_json(storage_keys::TOKEN, "abc").unwrap();
        assert_eq!(client.token().as_deref(), Some("abc"));
    }
}

//! Fake marketplace used by the wizard scenarios
#![allow(dead_code)]

use async_trait::async_trait;
use doorstep_client::api::{
    AccountApi, BookingApi, CatalogApi, CheckoutApi, CheckoutOrders, CouponRequest,
    CreateBookingRequest, GroupsRequest, QuoteApi, SlotsRequest, TotalsRequest,
};
use doorstep_client::models::{
    Address, AddressFields, AuthoritativeTotal, Bid, CapturePaymentRequest, LoginRequest,
    LoginResponse, OrderIds, OrderUpdateRequest, PaymentIntentRequest, PaymentIntentResponse,
    PriceBreakdown, Quote, SearchQuery, Service, ServiceGroup, SlotOption, Staff, UserInfo, Zone,
};
use doorstep_client::{ClientError, ClientResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub const VALID_COUPON: &str = "SAVE10";

/// In-memory marketplace: one group for all services, two slots, a single
/// valid coupon worth 5.
#[derive(Default)]
pub struct FakeMarket {
    pub calls: Mutex<Vec<&'static str>>,
    pub coupon_requests: Mutex<Vec<CouponRequest>>,
    pub totals_requests: Mutex<Vec<TotalsRequest>>,
    pub bookings: Mutex<Vec<CreateBookingRequest>>,
    pub cod_requests: Mutex<Vec<OrderUpdateRequest>>,
    pub saved_addresses: Mutex<Vec<AddressFields>>,
    /// Every call answers as if the bearer token was refused
    pub expired: AtomicBool,
}

impl FakeMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expire(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    pub fn called(&self, endpoint: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == endpoint).count()
    }

    fn hit(&self, endpoint: &'static str) -> ClientResult<()> {
        self.calls.lock().push(endpoint);
        if self.expired.load(Ordering::SeqCst) {
            return Err(ClientError::AuthExpired);
        }
        Ok(())
    }
}

pub fn haircut() -> Service {
    Service {
        id: 10,
        name: "Haircut".into(),
        image: Some("/img/haircut.jpg".into()),
        price: "$45".into(),
        discount: None,
        duration: Some(30),
        options: Vec::new(),
    }
}

pub fn sarah_at_two() -> SlotOption {
    SlotOption {
        slot: "14:00".into(),
        staff: Staff {
            id: 3,
            name: "Sarah".into(),
            image: None,
            extra_charge: None,
        },
    }
}

pub fn omar_at_three() -> SlotOption {
    SlotOption {
        slot: "15:00".into(),
        staff: Staff {
            id: 4,
            name: "Omar".into(),
            image: None,
            extra_charge: Some(5_i64.into()),
        },
    }
}

pub fn marina() -> Zone {
    Zone {
        id: 1,
        name: "Marina".into(),
    }
}

pub fn breakdown(pairs: &[(&str, i64)]) -> PriceBreakdown {
    pairs.iter().map(|(l, v)| (*l, *v)).collect()
}

#[async_trait]
impl AccountApi for FakeMarket {
    async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        self.hit("login")?;
        Ok(LoginResponse {
            token: "tok_1".into(),
            user: UserInfo {
                id: 5,
                name: "Amal".into(),
                email: request.email.clone(),
                phone_number: "0501234567".into(),
                whatsapp_number: "0501234567".into(),
                gender: "female".into(),
            },
        })
    }

    async fn zones(&self) -> ClientResult<Vec<Zone>> {
        self.hit("zones")?;
        Ok(vec![marina()])
    }

    async fn addresses(&self) -> ClientResult<Vec<Address>> {
        self.hit("addresses")?;
        Ok(Vec::new())
    }

    async fn save_address(&self, address: &AddressFields) -> ClientResult<()> {
        self.hit("save_address")?;
        self.saved_addresses.lock().push(address.clone());
        Ok(())
    }

    async fn delete_address(&self, _: i64) -> ClientResult<()> {
        self.hit("delete_address")
    }
}

#[async_trait]
impl CatalogApi for FakeMarket {
    async fn search(&self, _: &SearchQuery) -> ClientResult<Vec<Service>> {
        self.hit("search")?;
        Ok(vec![haircut()])
    }

    async fn service(&self, _: i64) -> ClientResult<Service> {
        self.hit("service")?;
        Ok(haircut())
    }
}

#[async_trait]
impl BookingApi for FakeMarket {
    async fn service_groups(&self, request: &GroupsRequest) -> ClientResult<Vec<ServiceGroup>> {
        self.hit("groups")?;
        Ok(vec![ServiceGroup {
            services: request.service_ids.clone(),
        }])
    }

    async fn available_slots(&self, _: &SlotsRequest) -> ClientResult<Vec<SlotOption>> {
        self.hit("slots")?;
        Ok(vec![sarah_at_two(), omar_at_three()])
    }

    async fn booking_totals(&self, request: &TotalsRequest) -> ClientResult<PriceBreakdown> {
        self.hit("totals")?;
        self.totals_requests.lock().push(request.clone());
        if request.coupon_code.as_deref() == Some(VALID_COUPON) {
            Ok(breakdown(&[("Subtotal", 45), ("Discount", -5), ("Tax", 4), ("Total", 44)]))
        } else {
            Ok(breakdown(&[("Subtotal", 45), ("Tax", 4), ("Total", 49)]))
        }
    }

    async fn apply_coupon(&self, request: &CouponRequest) -> ClientResult<()> {
        self.hit("apply_coupon")?;
        self.coupon_requests.lock().push(request.clone());
        if request.coupon_code == VALID_COUPON {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                status: 400,
                message: Some("Invalid coupon code".into()),
            })
        }
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ClientResult<OrderIds> {
        self.hit("create_booking")?;
        self.bookings.lock().push(request.clone());
        Ok(OrderIds::new(["12"]))
    }
}

#[async_trait]
impl CheckoutApi for FakeMarket {
    async fn orders(&self, _: &OrderIds, _: Option<i64>) -> ClientResult<CheckoutOrders> {
        self.hit("orders")?;
        let total: AuthoritativeTotal =
            serde_json::from_str(r#"{"amount":44,"currency":"usd","currencySymbol":"$"}"#)?;
        Ok(CheckoutOrders {
            orders: Vec::new(),
            total,
        })
    }

    async fn create_payment_intent(
        &self,
        _: &PaymentIntentRequest,
    ) -> ClientResult<PaymentIntentResponse> {
        self.hit("payment_intent")?;
        Ok(PaymentIntentResponse {
            client_secret: "pi_secret".into(),
        })
    }

    async fn capture_payment(&self, _: &CapturePaymentRequest) -> ClientResult<()> {
        self.hit("capture")
    }

    async fn confirm_cod(&self, request: &OrderUpdateRequest) -> ClientResult<()> {
        self.hit("orderupdate")?;
        self.cod_requests.lock().push(request.clone());
        Ok(())
    }
}

#[async_trait]
impl QuoteApi for FakeMarket {
    async fn quotes(&self) -> ClientResult<Vec<Quote>> {
        self.hit("quotes")?;
        Ok(Vec::new())
    }

    async fn quote(&self, _: i64) -> ClientResult<Quote> {
        Err(ClientError::Rejected {
            status: 404,
            message: None,
        })
    }

    async fn bids(&self, _: i64) -> ClientResult<Vec<Bid>> {
        Ok(Vec::new())
    }

    async fn confirm_bid(&self, _: i64, _: i64) -> ClientResult<()> {
        self.hit("confirm_bid")
    }
}

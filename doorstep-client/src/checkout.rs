//! Checkout - payment handoff
//!
//! Given the order ids of a booking, loads the server's authoritative total
//! and drives exactly one of two flows:
//! - card: payment intent → card collector → capture
//! - cash on delivery: a single order update
//!
//! Both end in [`Navigation::Confirmation`] for the same order set. Nothing
//! is retried automatically; a failure is recorded with the stage it
//! happened in and the user retries.

use async_trait::async_trait;
use shared::models::{
    AuthoritativeTotal, CapturePaymentRequest, Order, OrderIds, OrderUpdateRequest,
    PaymentIntentRequest, PaymentMethod,
};

use crate::api::CheckoutApi;
use crate::error::{ClientError, ClientResult};
use crate::logger::PAYMENT_TARGET;
use crate::navigation::Navigation;

/// Embedded card widget: turns a payment intent into a payment method token
#[async_trait]
pub trait CardCollector: Send + Sync {
    /// Collect card details for `client_secret`; `Err` carries the widget's message
    async fn collect(&self, client_secret: &str) -> Result<String, String>;
}

/// Where a checkout attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    LoadOrders,
    PaymentIntent,
    CardDetails,
    Capture,
    CashConfirm,
}

impl CheckoutStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadOrders => "load_orders",
            Self::PaymentIntent => "payment_intent",
            Self::CardDetails => "card_details",
            Self::Capture => "capture",
            Self::CashConfirm => "cash_confirm",
        }
    }
}

/// Inline error of the checkout screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFailure {
    pub stage: CheckoutStage,
    pub message: String,
}

/// State of one checkout screen
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    order_ids: OrderIds,
    zone_id: Option<i64>,
    orders: Vec<Order>,
    total: Option<AuthoritativeTotal>,
    method: Option<PaymentMethod>,
    client_secret: Option<String>,
    loading: bool,
    failure: Option<CheckoutFailure>,
}

impl CheckoutSession {
    pub fn new(order_ids: OrderIds, zone_id: Option<i64>) -> ClientResult<Self> {
        if order_ids.is_empty() {
            return Err(ClientError::not_allowed("No orders to pay for"));
        }
        Ok(Self {
            order_ids,
            zone_id,
            orders: Vec::new(),
            total: None,
            method: None,
            client_secret: None,
            loading: false,
            failure: None,
        })
    }

    /// Open checkout from the `orders=12,13` route parameter
    pub fn from_query(orders: &str, zone_id: Option<i64>) -> ClientResult<Self> {
        Self::new(OrderIds::parse_csv(orders), zone_id)
    }

    pub fn order_ids(&self) -> &OrderIds {
        &self.order_ids
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Amount to pay; only ever the server's figure
    pub fn total(&self) -> Option<&AuthoritativeTotal> {
        self.total.as_ref()
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn failure(&self) -> Option<&CheckoutFailure> {
        self.failure.as_ref()
    }

    /// Fetch the orders and their authoritative total
    pub async fn load<A: CheckoutApi + ?Sized>(&mut self, api: &A) -> ClientResult<()> {
        self.failure = None;
        match api.orders(&self.order_ids, self.zone_id).await {
            Ok(listing) => {
                tracing::info!(
                    target: PAYMENT_TARGET,
                    orders = %self.order_ids,
                    total = %listing.total.display(),
                    "Checkout loaded"
                );
                self.orders = listing.orders;
                self.total = Some(listing.total);
                Ok(())
            }
            Err(e) => Err(self.fail(CheckoutStage::LoadOrders, e)),
        }
    }

    /// Choose how to pay, tearing down anything the other method started
    pub fn select_method(&mut self, method: PaymentMethod) {
        if self.method == Some(method) {
            return;
        }
        tracing::debug!(target: PAYMENT_TARGET, orders = %self.order_ids, ?method, "Payment method selected");
        self.method = Some(method);
        self.client_secret = None;
        self.failure = None;
    }

    /// Run the card flow to completion
    pub async fn pay_by_card<A, C>(&mut self, api: &A, collector: &C) -> ClientResult<Navigation>
    where
        A: CheckoutApi + ?Sized,
        C: CardCollector + ?Sized,
    {
        self.begin(PaymentMethod::Card)?;
        let result = self.card_flow(api, collector).await;
        self.finish(result)
    }

    /// Confirm cash on delivery
    pub async fn confirm_cash<A: CheckoutApi + ?Sized>(&mut self, api: &A) -> ClientResult<Navigation> {
        self.begin(PaymentMethod::Cod)?;
        let request = OrderUpdateRequest {
            order_ids: self.order_ids.clone(),
            payment_method: PaymentMethod::Cod,
        };
        let result = match api.confirm_cod(&request).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(CheckoutStage::CashConfirm, e)),
        };
        self.finish(result)
    }

    fn begin(&mut self, method: PaymentMethod) -> ClientResult<()> {
        if self.loading {
            return Err(ClientError::not_allowed("Payment is already in progress"));
        }
        if self.method != Some(method) {
            return Err(ClientError::not_allowed("Select this payment method first"));
        }
        if self.total.is_none() {
            return Err(ClientError::not_allowed("Order total is not loaded yet"));
        }
        self.loading = true;
        self.failure = None;
        Ok(())
    }

    /// Resolve the loading state either way
    fn finish(&mut self, result: ClientResult<()>) -> ClientResult<Navigation> {
        self.loading = false;
        result?;
        tracing::info!(target: PAYMENT_TARGET, orders = %self.order_ids, method = ?self.method, "Payment completed");
        let orders = self.order_ids.clone();
        self.client_secret = None;
        self.method = None;
        Ok(Navigation::Confirmation { orders })
    }

    async fn card_flow<A, C>(&mut self, api: &A, collector: &C) -> ClientResult<()>
    where
        A: CheckoutApi + ?Sized,
        C: CardCollector + ?Sized,
    {
        let Some(total) = self.total.clone() else {
            return Err(ClientError::not_allowed("Order total is not loaded yet"));
        };

        let client_secret = match self.client_secret.clone() {
            Some(secret) => secret,
            None => {
                let request = PaymentIntentRequest {
                    amount: total.amount().clone(),
                    currency: total.currency().to_string(),
                    description: format!("Booking orders {}", self.order_ids),
                };
                match api.create_payment_intent(&request).await {
                    Ok(resp) => {
                        self.client_secret = Some(resp.client_secret.clone());
                        resp.client_secret
                    }
                    Err(e) => return Err(self.fail(CheckoutStage::PaymentIntent, e)),
                }
            }
        };

        let payment_method_id = match collector.collect(&client_secret).await {
            Ok(id) => id,
            Err(message) => {
                return Err(self.fail(CheckoutStage::CardDetails, ClientError::Payment(message)));
            }
        };

        let request = CapturePaymentRequest {
            payment_method_id,
            amount: total.amount().clone(),
            currency: total.currency().to_string(),
            order_ids: self.order_ids.clone(),
        };
        if let Err(e) = api.capture_payment(&request).await {
            return Err(self.fail(CheckoutStage::Capture, e));
        }
        Ok(())
    }

    fn fail(&mut self, stage: CheckoutStage, error: ClientError) -> ClientError {
        tracing::warn!(
            target: PAYMENT_TARGET,
            orders = %self.order_ids,
            stage = stage.name(),
            error = %error,
            "Checkout step failed"
        );
        self.failure = Some(CheckoutFailure {
            stage,
            message: error.user_message(),
        });
        error
    }
}

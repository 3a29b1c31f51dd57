//! Payment Model

use super::order::OrderIds;
use super::price::Price;
use serde::{Deserialize, Serialize};

/// How the customer settles the orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cod,
}

/// Payment intent creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    pub amount: Price,
    pub currency: String,
    pub description: String,
}

/// Payment intent response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Card capture payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturePaymentRequest {
    #[serde(rename = "paymentMethodId")]
    pub payment_method_id: String,
    pub amount: Price,
    pub currency: String,
    pub order_ids: OrderIds,
}

/// Payment method update payload (cash on delivery)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdateRequest {
    pub order_ids: OrderIds,
    pub payment_method: PaymentMethod,
}

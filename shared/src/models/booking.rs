//! Booking Model
//!
//! Grouping and availability as computed by the server. A group is a set of
//! selected services that one staff member fulfils in one time slot; the
//! client never derives groups itself.

use super::order::OrderIds;
use super::price::{Price, PriceBreakdown};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server-derived group of service ids sharing one staff and slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub services: Vec<i64>,
}

/// Groups response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub groups: Vec<ServiceGroup>,
}

/// Staff member able to serve a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Flat surcharge for booking this staff member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_charge: Option<Price>,
}

impl Staff {
    pub fn extra_charge(&self) -> Decimal {
        self.extra_charge
            .as_ref()
            .map(Price::amount_or_zero)
            .unwrap_or(Decimal::ZERO)
    }
}

/// One bookable (slot, staff) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOption {
    /// Start time as shown by the server, e.g. "14:00"
    pub slot: String,
    pub staff: Staff,
}

/// Available slots for one group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotsResponse {
    #[serde(default)]
    pub slots: Vec<SlotOption>,
}

/// Totals response: the authoritative label → value breakdown
pub type TotalsResponse = PriceBreakdown;

/// Response of the booking submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingCreated {
    #[serde(default)]
    pub order_ids: Vec<serde_json::Value>,
}

impl BookingCreated {
    /// Created order ids, whatever JSON type the server used for them
    pub fn order_ids(&self) -> OrderIds {
        OrderIds::new(self.order_ids.iter().map(|id| match id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

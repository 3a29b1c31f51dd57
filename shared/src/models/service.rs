//! Service Model

use super::price::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bookable option of a service (e.g. "Long hair"), may change price/duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOption {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Extra minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Service entity (salon, grooming, automotive, quote request...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Price>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ServiceOption>,
}

impl Service {
    /// Catalog price without options, add-ons or coupons
    pub fn base_price(&self) -> Decimal {
        self.price.amount_or_zero()
    }
}

/// Option reference kept in the selection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRef {
    pub id: i64,
    pub name: String,
}

/// Entry of the pre-wizard selection list, persisted as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedService {
    pub service: Service,
    #[serde(default)]
    pub options: Vec<OptionRef>,
    #[serde(default, rename = "addOns")]
    pub add_ons: Vec<i64>,
}

impl SelectedService {
    pub fn new(service: Service) -> Self {
        Self {
            service,
            options: Vec::new(),
            add_ons: Vec::new(),
        }
    }

    pub fn id(&self) -> i64 {
        self.service.id
    }
}

/// Sort order accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSort {
    PriceAsc,
    PriceDesc,
    Popular,
    Newest,
}

/// Search query, sent as URL query parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SearchSort>,
    #[serde(rename = "zoneId", skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i64>,
}

impl SearchQuery {
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Default::default()
        }
    }

    pub fn with_zone(mut self, zone_id: Option<i64>) -> Self {
        self.zone_id = zone_id;
        self
    }
}

/// Search response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub services: Vec<Service>,
}

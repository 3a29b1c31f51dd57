//! Address Model

use serde::{Deserialize, Serialize};

/// The address part of a booking, shared by the manual form and saved addresses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    #[serde(default)]
    pub building_name: String,
    #[serde(default)]
    pub flat_or_villa: String,
    #[serde(default)]
    pub street: String,
    /// Locked to the selected zone's name
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub city: String,
    /// Free-form override, sent verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
}

/// Saved address entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    #[serde(flatten)]
    pub fields: AddressFields,
}

/// Address list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressesResponse {
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// Delete address payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAddressRequest {
    pub address_id: i64,
}

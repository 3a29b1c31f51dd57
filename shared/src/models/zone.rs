//! Zone Model

use serde::{Deserialize, Serialize};

/// Geographic service area; decides address eligibility, staff and pricing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
}

/// Zone list response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZonesResponse {
    #[serde(default)]
    pub zones: Vec<Zone>,
}

//! Customer details Model

use super::address::AddressFields;
use serde::{Deserialize, Serialize};

/// Fields that must be non-blank before the details step can be submitted
pub const REQUIRED_FIELDS: [&str; 12] = [
    "name",
    "email",
    "phone_number",
    "whatsapp_number",
    "gender",
    "building_name",
    "flat_or_villa",
    "street",
    "area",
    "district",
    "landmark",
    "city",
];

/// Identity, address and commerce fields of a booking
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub gender: String,
    #[serde(flatten)]
    pub address: AddressFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Persist this address/profile for later bookings (authenticated only)
    #[serde(default)]
    pub save_data: bool,
    /// Set when a saved address is reused instead of the manual form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_address_id: Option<i64>,
}

impl CustomerDetails {
    fn field(&self, name: &str) -> &str {
        match name {
            "name" => &self.name,
            "email" => &self.email,
            "phone_number" => &self.phone_number,
            "whatsapp_number" => &self.whatsapp_number,
            "gender" => &self.gender,
            "building_name" => &self.address.building_name,
            "flat_or_villa" => &self.address.flat_or_villa,
            "street" => &self.address.street,
            "area" => &self.address.area,
            "district" => &self.address.district,
            "landmark" => &self.address.landmark,
            "city" => &self.address.city,
            _ => "",
        }
    }

    /// Required fields that are empty or whitespace-only, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|f| self.field(f).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Trimmed coupon code, `None` when blank
    pub fn coupon(&self) -> Option<&str> {
        self.coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Profile fields cached locally to prefill forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub gender: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> CustomerDetails {
        CustomerDetails {
            name: "Amal".into(),
            email: "amal@example.com".into(),
            phone_number: "0501234567".into(),
            whatsapp_number: "0501234567".into(),
            gender: "female".into(),
            address: AddressFields {
                building_name: "Palm Tower".into(),
                flat_or_villa: "1204".into(),
                street: "Sheikh Zayed Rd".into(),
                area: "Marina".into(),
                district: "Dubai Marina".into(),
                landmark: "Near metro".into(),
                city: "Dubai".into(),
                latitude: None,
                longitude: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_details() {
        assert!(complete().is_complete());
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut details = complete();
        details.email = "   ".into();
        details.address.landmark = String::new();
        assert_eq!(details.missing_fields(), vec!["email", "landmark"]);
    }

    #[test]
    fn test_address_is_flattened_on_the_wire() {
        let json = serde_json::to_value(complete()).unwrap();
        assert_eq!(json["building_name"], "Palm Tower");
        assert!(json.get("address").is_none());
    }

    #[test]
    fn test_blank_coupon_is_none() {
        let mut details = complete();
        details.coupon_code = Some("  ".into());
        assert_eq!(details.coupon(), None);
        details.coupon_code = Some(" SAVE10 ".into());
        assert_eq!(details.coupon(), Some("SAVE10"));
    }
}

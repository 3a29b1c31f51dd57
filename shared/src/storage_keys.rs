//! Keys of the persisted client session
//!
//! Every value is stored as a JSON document (strings as JSON strings).

/// Bearer token of the logged-in customer
pub const TOKEN: &str = "token";
/// Id of the logged-in customer
pub const USER_ID: &str = "user_id";
/// Selected zone
pub const ZONE_ID: &str = "zone_id";
pub const ZONE_NAME: &str = "zone_name";
/// Pre-wizard selection list (`[{service, options, addOns}]`)
pub const SELECTED_SERVICES: &str = "selectedServices";
/// Cached profile fields used to prefill forms
pub const PROFILE: &str = "profile";
/// Last coupon code accepted by the server
pub const APPLIED_COUPON: &str = "applied_coupon";

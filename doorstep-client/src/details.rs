//! Customer details step
//!
//! Editing rules of the details form: one-time hydration from the cached
//! profile, the area locked to the selected zone, saved addresses replacing
//! the address block in one go, and `save_data` reserved for logged-in users.

use shared::models::{Address, CustomerDetails, Profile, Zone};
use shared::storage_keys;
use shared::ValidationError;

use crate::error::{ClientError, ClientResult};
use crate::store::{SessionStore, SessionStoreExt};

/// Editable text field of the details form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailsField {
    Name,
    Email,
    PhoneNumber,
    WhatsappNumber,
    Gender,
    BuildingName,
    FlatOrVilla,
    Street,
    Area,
    District,
    Landmark,
    City,
    Latitude,
    Longitude,
    AffiliateCode,
}

impl DetailsField {
    /// Part of the address block (editing it detaches a saved address)
    pub fn is_address(&self) -> bool {
        matches!(
            self,
            Self::BuildingName
                | Self::FlatOrVilla
                | Self::Street
                | Self::Area
                | Self::District
                | Self::Landmark
                | Self::City
                | Self::Latitude
                | Self::Longitude
        )
    }
}

/// Prefill identity fields from the cached profile, leaving edits alone.
///
/// Returns whether a profile was found.
pub fn hydrate<S: SessionStore + ?Sized>(details: &mut CustomerDetails, store: &S) -> bool {
    let Some(profile) = store.get_json::<Profile>(storage_keys::PROFILE) else {
        return false;
    };
    fill_blank(&mut details.name, profile.name);
    fill_blank(&mut details.email, profile.email);
    fill_blank(&mut details.phone_number, profile.phone_number);
    fill_blank(&mut details.whatsapp_number, profile.whatsapp_number);
    fill_blank(&mut details.gender, profile.gender);
    true
}

fn fill_blank(slot: &mut String, value: String) {
    if slot.trim().is_empty() {
        *slot = value;
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Lock the area to the zone's name
pub fn lock_area(details: &mut CustomerDetails, zone: &Zone) {
    details.address.area = zone.name.clone();
}

/// Apply one user edit
pub fn set_field(
    details: &mut CustomerDetails,
    zone: Option<&Zone>,
    field: DetailsField,
    value: &str,
) -> ClientResult<()> {
    if field == DetailsField::Area
        && let Some(zone) = zone
        && value.trim() != zone.name
    {
        return Err(ClientError::not_allowed(format!(
            "Area is set by the selected zone ({})",
            zone.name
        )));
    }

    let value = value.to_string();
    let address = &mut details.address;
    match field {
        DetailsField::Name => details.name = value,
        DetailsField::Email => details.email = value,
        DetailsField::PhoneNumber => details.phone_number = value,
        DetailsField::WhatsappNumber => details.whatsapp_number = value,
        DetailsField::Gender => details.gender = value,
        DetailsField::BuildingName => address.building_name = value,
        DetailsField::FlatOrVilla => address.flat_or_villa = value,
        DetailsField::Street => address.street = value,
        DetailsField::Area => address.area = value,
        DetailsField::District => address.district = value,
        DetailsField::Landmark => address.landmark = value,
        DetailsField::City => address.city = value,
        DetailsField::Latitude => address.latitude = optional(&value),
        DetailsField::Longitude => address.longitude = optional(&value),
        DetailsField::AffiliateCode => details.affiliate_code = optional(&value),
    }
    if field.is_address() {
        details.selected_address_id = None;
    }
    Ok(())
}

/// Reuse a saved address, replacing the whole address block at once.
///
/// Addresses outside the selected zone are refused and leave the form as is.
pub fn select_saved_address(
    details: &mut CustomerDetails,
    zone: Option<&Zone>,
    address: &Address,
) -> ClientResult<()> {
    if let Some(zone) = zone
        && !address.fields.area.trim().is_empty()
        && address.fields.area.trim() != zone.name
    {
        return Err(ClientError::not_allowed(format!(
            "This address is outside {}",
            zone.name
        )));
    }
    details.address = address.fields.clone();
    if let Some(zone) = zone {
        lock_area(details, zone);
    }
    details.selected_address_id = Some(address.id);
    Ok(())
}

/// Turn `save_data` on or off; only logged-in customers can save
pub fn set_save_data(
    details: &mut CustomerDetails,
    enabled: bool,
    authenticated: bool,
) -> ClientResult<()> {
    if enabled && !authenticated {
        return Err(ClientError::not_allowed("Log in to save your details"));
    }
    details.save_data = enabled;
    Ok(())
}

/// Required-field check run before any network call
pub fn validate(details: &CustomerDetails) -> Result<(), ValidationError> {
    let missing = details.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use shared::models::AddressFields;

    fn marina() -> Zone {
        Zone {
            id: 2,
            name: "Marina".into(),
        }
    }

    fn saved(area: &str) -> Address {
        Address {
            id: 41,
            fields: AddressFields {
                building_name: "Palm Tower".into(),
                flat_or_villa: "1204".into(),
                street: "Al Sufouh".into(),
                area: area.into(),
                district: "Dubai Marina".into(),
                landmark: "Near metro".into(),
                city: "Dubai".into(),
                latitude: Some("25.08".into()),
                longitude: Some("55.14".into()),
            },
        }
    }

    #[test]
    fn test_hydrate_fills_only_blank_fields() {
        let store = MemoryStore::new();
        let profile = Profile {
            name: "Amal".into(),
            email: "amal@example.com".into(),
            phone_number: "0501234567".into(),
            whatsapp_number: "0501234567".into(),
            gender: "female".into(),
        };
        store.set_json(storage_keys::PROFILE, &profile).unwrap();

        let mut details = CustomerDetails {
            name: "Amal K".into(),
            ..Default::default()
        };
        assert!(hydrate(&mut details, &store));
        assert_eq!(details.name, "Amal K");
        assert_eq!(details.email, "amal@example.com");
        assert_eq!(details.gender, "female");
    }

    #[test]
    fn test_hydrate_without_profile() {
        let mut details = CustomerDetails::default();
        assert!(!hydrate(&mut details, &MemoryStore::new()));
        assert_eq!(details, CustomerDetails::default());
    }

    #[test]
    fn test_area_locked_to_zone() {
        let mut details = CustomerDetails::default();
        lock_area(&mut details, &marina());

        let err = set_field(&mut details, Some(&marina()), DetailsField::Area, "Deira").unwrap_err();
        assert_eq!(err.kind(), shared::ErrorKind::Validation);
        assert_eq!(details.address.area, "Marina");

        set_field(&mut details, None, DetailsField::Area, "Deira").unwrap();
        assert_eq!(details.address.area, "Deira");
    }

    #[test]
    fn test_saved_address_overwrites_block() {
        let mut details = CustomerDetails::default();
        set_field(&mut details, None, DetailsField::Street, "Old street").unwrap();
        set_field(&mut details, None, DetailsField::Name, "Amal").unwrap();

        select_saved_address(&mut details, Some(&marina()), &saved("Marina")).unwrap();
        assert_eq!(details.address.street, "Al Sufouh");
        assert_eq!(details.address.latitude.as_deref(), Some("25.08"));
        assert_eq!(details.selected_address_id, Some(41));
        assert_eq!(details.name, "Amal");

        // A manual address edit detaches the saved address
        set_field(&mut details, Some(&marina()), DetailsField::Landmark, "Gate 2").unwrap();
        assert_eq!(details.selected_address_id, None);
    }

    #[test]
    fn test_saved_address_from_other_zone_refused() {
        let mut details = CustomerDetails::default();
        let before = details.clone();
        assert!(select_saved_address(&mut details, Some(&marina()), &saved("Deira")).is_err());
        assert_eq!(details, before);
    }

    #[test]
    fn test_save_data_requires_login() {
        let mut details = CustomerDetails::default();
        assert!(set_save_data(&mut details, true, false).is_err());
        assert!(!details.save_data);
        set_save_data(&mut details, true, true).unwrap();
        assert!(details.save_data);
        set_save_data(&mut details, false, false).unwrap();
        assert!(!details.save_data);
    }

    #[test]
    fn test_validate_lists_missing_fields() {
        let mut details = CustomerDetails::default();
        set_field(&mut details, None, DetailsField::Name, "  ").unwrap();
        match validate(&details) {
            Err(ValidationError::MissingFields(fields)) => {
                assert_eq!(fields.len(), 12);
                assert_eq!(fields[0], "name");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

//! Booking draft - the aggregate filled in step by step

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{CustomerDetails, SelectedService, Service, ServiceGroup, SlotOption};
use std::collections::{BTreeMap, BTreeSet};

/// Server verdict on the coupon code of the draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponState {
    /// Code the server last answered 200 for
    pub accepted: Option<String>,
    /// Message of the last rejection; blocks the details step while set
    pub error: Option<String>,
}

impl CouponState {
    pub fn accept(&mut self, code: &str) {
        self.accepted = Some(code.to_string());
        self.error = None;
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.accepted = None;
        self.error = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.accepted = None;
        self.error = None;
    }
}

/// In-progress booking, owned by the wizard for one booking attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    /// Unique by id, in the order the user picked them
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default, rename = "serviceOptions")]
    pub service_options: BTreeMap<i64, BTreeSet<i64>>,
    #[serde(default, rename = "addOns")]
    pub add_ons: BTreeSet<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Partition of `services` as computed by the server
    #[serde(default)]
    pub groups: Vec<ServiceGroup>,
    /// Group index → chosen slot and staff
    #[serde(default, rename = "selectedSlots")]
    pub selected_slots: BTreeMap<usize, SlotOption>,
    #[serde(default, rename = "customerDetails")]
    pub customer_details: CustomerDetails,
    #[serde(skip)]
    pub coupon: CouponState,
}

/// Partial update merged into a draft; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub services: Option<Vec<Service>>,
    pub service_options: Option<BTreeMap<i64, BTreeSet<i64>>>,
    pub add_ons: Option<BTreeSet<i64>>,
    pub date: Option<NaiveDate>,
    pub groups: Option<Vec<ServiceGroup>>,
    pub selected_slots: Option<BTreeMap<usize, SlotOption>>,
    pub customer_details: Option<CustomerDetails>,
}

impl DraftPatch {
    pub fn services(services: Vec<Service>) -> Self {
        Self {
            services: Some(services),
            ..Default::default()
        }
    }

    pub fn customer_details(details: CustomerDetails) -> Self {
        Self {
            customer_details: Some(details),
            ..Default::default()
        }
    }
}

/// What a merge actually changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DraftChanges {
    /// The service set changed; grouping was thrown away
    pub services: bool,
    /// Anything that feeds the price changed
    pub pricing: bool,
}

impl BookingDraft {
    /// Seed a draft from the pre-wizard selection list
    pub fn from_selection(entries: &[SelectedService]) -> Self {
        let mut draft = Self::default();
        for entry in entries {
            if draft.add_service(entry.service.clone()) {
                let options: BTreeSet<i64> = entry.options.iter().map(|o| o.id).collect();
                if !options.is_empty() {
                    draft.service_options.insert(entry.id(), options);
                }
                draft.add_ons.extend(entry.add_ons.iter().copied());
            }
        }
        draft
    }

    pub fn service_ids(&self) -> Vec<i64> {
        self.services.iter().map(|s| s.id).collect()
    }

    pub fn has_service(&self, service_id: i64) -> bool {
        self.services.iter().any(|s| s.id == service_id)
    }

    /// Append a service; `false` if one with that id is already selected
    pub fn add_service(&mut self, service: Service) -> bool {
        if self.has_service(service.id) {
            return false;
        }
        self.services.push(service);
        self.invalidate_grouping();
        true
    }

    /// Drop a service together with its option choices
    pub fn remove_service(&mut self, service_id: i64) -> bool {
        let before = self.services.len();
        self.services.retain(|s| s.id != service_id);
        if self.services.len() == before {
            return false;
        }
        self.service_options.remove(&service_id);
        self.invalidate_grouping();
        true
    }

    /// Forget the server grouping and every slot chosen under it
    pub fn invalidate_grouping(&mut self) {
        self.groups.clear();
        self.selected_slots.clear();
    }

    /// Every group has a (slot, staff) selection
    pub fn all_groups_selected(&self) -> bool {
        (0..self.groups.len()).all(|i| self.selected_slots.contains_key(&i))
    }

    /// Groups are loaded and each one has a slot
    pub fn is_scheduled(&self) -> bool {
        !self.groups.is_empty() && self.all_groups_selected()
    }

    /// The coupon code is absent, or it is the one the server accepted
    pub fn coupon_settled(&self) -> bool {
        if self.coupon.error.is_some() {
            return false;
        }
        match self.customer_details.coupon() {
            None => true,
            Some(code) => self.coupon.accepted.as_deref() == Some(code),
        }
    }

    /// Shallow merge: every field present in `patch` replaces the draft's.
    ///
    /// A different service set invalidates groups and slot selections
    /// unless the patch brings its own.
    pub fn merge(&mut self, patch: DraftPatch) -> DraftChanges {
        let mut changes = DraftChanges::default();

        if let Some(services) = patch.services {
            let mut unique: Vec<Service> = Vec::with_capacity(services.len());
            for service in services {
                if !unique.iter().any(|s| s.id == service.id) {
                    unique.push(service);
                }
            }
            if unique != self.services {
                let old_ids = self.service_ids();
                self.services = unique;
                self.service_options.retain(|id, _| self.services.iter().any(|s| s.id == *id));
                if old_ids != self.service_ids() {
                    changes.services = true;
                    self.invalidate_grouping();
                }
                changes.pricing = true;
            }
        }
        if let Some(options) = patch.service_options
            && options != self.service_options
        {
            self.service_options = options;
            changes.pricing = true;
        }
        if let Some(add_ons) = patch.add_ons
            && add_ons != self.add_ons
        {
            self.add_ons = add_ons;
            changes.pricing = true;
        }
        if let Some(date) = patch.date
            && self.date != Some(date)
        {
            self.date = Some(date);
            self.selected_slots.clear();
            changes.pricing = true;
        }
        if let Some(groups) = patch.groups {
            if groups != self.groups {
                self.selected_slots.clear();
            }
            self.groups = groups;
        }
        if let Some(slots) = patch.selected_slots
            && slots != self.selected_slots
        {
            self.selected_slots = slots;
            changes.pricing = true;
        }
        if let Some(details) = patch.customer_details
            && details != self.customer_details
        {
            if details.address != self.customer_details.address {
                changes.pricing = true;
            }
            self.customer_details = details;
        }

        changes
    }
}

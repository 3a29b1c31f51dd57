//! Grouping and availability reconciler
//!
//! Groups are derived by the server from the full service set; the client
//! only asks. After the groups arrive, the (slot, staff) options of every
//! group are fetched for the chosen date, concurrently.

use chrono::NaiveDate;
use futures::future::try_join_all;
use shared::models::{ServiceGroup, SlotOption};

use crate::api::{BookingApi, GroupsRequest, SlotsRequest};
use crate::error::{ClientError, ClientResult};
use crate::wizard::BookingDraft;

/// Bookable options of one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAvailability {
    pub group: ServiceGroup,
    pub options: Vec<SlotOption>,
}

impl GroupAvailability {
    /// No (slot, staff) combination is offered for this group
    pub fn is_unavailable(&self) -> bool {
        self.options.is_empty()
    }
}

/// Outcome of a slot selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSelection {
    /// The group's previous selection was replaced
    Changed,
    /// The same pair was already selected
    Unchanged,
}

/// Availability fetched for one service set and date
#[derive(Debug, Clone, Default)]
pub struct AvailabilityReconciler {
    services: Vec<i64>,
    date: Option<NaiveDate>,
    groups: Vec<GroupAvailability>,
}

impl AvailabilityReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[GroupAvailability] {
        &self.groups
    }

    /// Indices of groups nobody can serve on the chosen date
    pub fn unavailable_groups(&self) -> Vec<usize> {
        self.groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.is_unavailable())
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether what was fetched still matches the draft's services and date
    pub fn is_current(&self, draft: &BookingDraft) -> bool {
        !self.groups.is_empty() && self.services == draft.service_ids() && self.date == draft.date
    }

    /// Re-derive grouping from scratch and fetch slots for every group.
    ///
    /// Clears the draft's groups and selections first; on failure they stay
    /// empty so nothing stale can be booked.
    pub async fn refresh<A: BookingApi + ?Sized>(
        &mut self,
        api: &A,
        draft: &mut BookingDraft,
        zone_id: Option<i64>,
    ) -> ClientResult<()> {
        if draft.services.is_empty() {
            return Err(ClientError::not_allowed("Select at least one service"));
        }
        let Some(date) = draft.date else {
            return Err(ClientError::not_allowed("Choose a date to see availability"));
        };

        draft.invalidate_grouping();
        self.groups.clear();
        let service_ids = draft.service_ids();

        let groups = api
            .service_groups(&GroupsRequest {
                service_ids: service_ids.clone(),
                zone_id,
            })
            .await?;
        if groups.is_empty() {
            return Err(ClientError::InvalidResponse(
                "no groups returned for the selected services".into(),
            ));
        }

        let requests: Vec<SlotsRequest> = groups
            .iter()
            .map(|g| SlotsRequest {
                service_ids: g.services.clone(),
                date,
                zone_id,
            })
            .collect();
        let slots = try_join_all(requests.iter().map(|r| api.available_slots(r))).await?;

        self.groups = groups
            .iter()
            .cloned()
            .zip(slots)
            .map(|(group, options)| GroupAvailability { group, options })
            .collect();
        self.services = service_ids;
        self.date = Some(date);
        draft.groups = groups;

        let unavailable = self.unavailable_groups();
        tracing::info!(
            groups = self.groups.len(),
            ?unavailable,
            %date,
            "Availability loaded"
        );
        Ok(())
    }

    /// Replace the selection of `group_index` with `option`.
    ///
    /// The option must be one the server offered for that group.
    pub fn on_slot_select(
        &self,
        draft: &mut BookingDraft,
        group_index: usize,
        option: SlotOption,
    ) -> ClientResult<SlotSelection> {
        let Some(group) = self.groups.get(group_index) else {
            return Err(ClientError::not_allowed(format!(
                "Unknown group {group_index}"
            )));
        };
        if group_index >= draft.groups.len() {
            return Err(ClientError::not_allowed("Availability is out of date"));
        }
        if !group.options.contains(&option) {
            return Err(ClientError::not_allowed(
                "This time is no longer available",
            ));
        }

        if draft.selected_slots.get(&group_index) == Some(&option) {
            return Ok(SlotSelection::Unchanged);
        }
        tracing::debug!(group_index, slot = %option.slot, staff_id = option.staff.id, "Slot selected");
        draft.selected_slots.insert(group_index, option);
        Ok(SlotSelection::Changed)
    }
}

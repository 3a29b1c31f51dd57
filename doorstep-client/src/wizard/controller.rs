//! Wizard step controller

use shared::models::Service;
use std::collections::HashMap;
use uuid::Uuid;

use super::draft::{BookingDraft, DraftChanges, DraftPatch};
use super::step::{Step, can_proceed};

/// Current step, the draft, and the per-step error strings of one booking
/// attempt. Performs no I/O.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    attempt_id: Uuid,
    step: Step,
    draft: BookingDraft,
    errors: HashMap<Step, String>,
    loading: bool,
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new(BookingDraft::default())
    }
}

impl BookingWizard {
    /// Start at the service step with a seeded draft
    pub fn new(draft: BookingDraft) -> Self {
        let attempt_id = Uuid::new_v4();
        tracing::debug!(%attempt_id, services = draft.services.len(), "Booking wizard started");
        Self {
            attempt_id,
            step: Step::FIRST,
            draft,
            errors: HashMap::new(),
            loading: false,
        }
    }

    /// "Book now" entry: seed one service and skip straight to slot selection
    pub fn with_service(service: Service) -> Self {
        let mut draft = BookingDraft::default();
        draft.add_service(service);
        let mut wizard = Self::new(draft);
        wizard.step = Step::Slot;
        wizard
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub(crate) fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    /// Shallow-merge `patch` into the draft
    pub fn update_booking_data(&mut self, patch: DraftPatch) -> DraftChanges {
        let changes = self.draft.merge(patch);
        if changes.services {
            tracing::debug!(attempt_id = %self.attempt_id, "Service set changed, grouping invalidated");
        }
        self.return_to_slot();
        changes
    }

    /// Step back to slot selection when a later step has lost its slots.
    ///
    /// Returns whether the step moved.
    pub fn return_to_slot(&mut self) -> bool {
        if self.step <= Step::Slot || self.draft.is_scheduled() {
            return false;
        }
        tracing::info!(
            attempt_id = %self.attempt_id,
            from = %self.step,
            to = %Step::Slot,
            "Slots no longer chosen, returning to slot selection"
        );
        self.step = Step::Slot;
        true
    }

    /// Whether the current step may be left forward
    pub fn can_proceed(&self) -> bool {
        if self.errors.contains_key(&self.step) {
            return false;
        }
        // Availability has to be loaded before an empty selection means anything
        if self.step == Step::Slot && self.draft.groups.is_empty() {
            return false;
        }
        can_proceed(self.step, &self.draft)
    }

    /// Advance one step; no-op on the last step or while the gate is closed
    pub fn next_step(&mut self) -> bool {
        let Some(next) = self.step.next() else {
            return false;
        };
        if !self.can_proceed() {
            tracing::debug!(attempt_id = %self.attempt_id, step = %self.step, "Forward navigation blocked");
            return false;
        }
        tracing::info!(attempt_id = %self.attempt_id, from = %self.step, to = %next, "Wizard step");
        self.step = next;
        true
    }

    /// Go back exactly one step; no-op on the first step
    pub fn prev_step(&mut self) -> bool {
        let Some(prev) = self.step.prev() else {
            return false;
        };
        tracing::info!(attempt_id = %self.attempt_id, from = %self.step, to = %prev, "Wizard step");
        self.step = prev;
        true
    }

    pub fn error(&self, step: Step) -> Option<&str> {
        self.errors.get(&step).map(String::as_str)
    }

    /// Surface an inline error on `step`; it blocks that step until cleared
    pub fn set_error(&mut self, step: Step, message: impl Into<String>) {
        self.errors.insert(step, message.into());
    }

    pub fn clear_error(&mut self, step: Step) {
        self.errors.remove(&step);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// The final submit is available on the summary step when idle and
    /// every group still has a slot
    pub fn can_submit(&self) -> bool {
        self.step == Step::Summary && !self.loading && self.draft.is_scheduled()
    }
}

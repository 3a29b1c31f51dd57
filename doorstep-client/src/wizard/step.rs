//! Wizard steps and their gating predicate

use serde::{Deserialize, Serialize};

use super::draft::BookingDraft;

/// Booking wizard step, numbered 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Service = 1,
    Slot = 2,
    Details = 3,
    Summary = 4,
}

impl Step {
    pub const FIRST: Step = Step::Service;
    pub const LAST: Step = Step::Summary;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Service),
            2 => Some(Self::Slot),
            3 => Some(Self::Details),
            4 => Some(Self::Summary),
            _ => None,
        }
    }

    /// Following step, `None` on the last one
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    /// Preceding step, `None` on the first one
    pub fn prev(self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Slot => "slot",
            Self::Details => "details",
            Self::Summary => "summary",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the draft satisfies what `step` requires to move forward.
///
/// Pure over its inputs. Per-step error strings are checked by the wizard on
/// top of this.
pub fn can_proceed(step: Step, draft: &BookingDraft) -> bool {
    match step {
        Step::Service => !draft.services.is_empty(),
        Step::Slot => draft.all_groups_selected(),
        Step::Details => draft.customer_details.is_complete() && draft.coupon_settled(),
        Step::Summary => true,
    }
}

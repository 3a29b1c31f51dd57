//! Booking wizard
//!
//! A linear four-step flow (service → slot → details → summary) over a
//! single [`BookingDraft`]. Gating is a pure function of the step and the
//! draft ([`can_proceed`]); network work lives in the reconcilers and the
//! [`crate::booking::BookingSession`] that drives them.

mod controller;
mod draft;
mod step;

pub use controller::BookingWizard;
pub use draft::{BookingDraft, CouponState, DraftChanges, DraftPatch};
pub use step::{Step, can_proceed};

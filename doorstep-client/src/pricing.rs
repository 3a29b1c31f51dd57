//! Pricing reconciler - totals and coupons
//!
//! `totals` is a cache of the server's last answer for the whole draft,
//! refreshed on every price-relevant change and replaced wholesale. Before
//! the first answer a client-side estimate may be shown; it is a separate
//! type that cannot be mistaken for, or mixed with, a server figure.

use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::PriceBreakdown;
use shared::storage_keys;

use crate::api::{BookingApi, CouponRequest, TotalsRequest};
use crate::error::{ClientError, ClientResult};
use crate::latest::LatestWins;
use crate::store::{SessionStore, SessionStoreExt};
use crate::wizard::BookingDraft;

/// Flat tax rate of the client-side estimate (8%)
pub const ESTIMATE_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Label shown next to an estimate
pub const ESTIMATE_LABEL: &str = "Estimated";

// ============================================================================
// Estimate
// ============================================================================

/// Client-side stopgap total, shown only until the server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatedTotal {
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl EstimatedTotal {
    /// Σ service base prices + Σ staff extra charges, plus the flat tax
    pub fn from_draft(draft: &BookingDraft) -> Self {
        let services: Decimal = draft.services.iter().map(|s| s.base_price()).sum();
        let staff: Decimal = draft
            .selected_slots
            .values()
            .map(|s| s.staff.extra_charge())
            .sum();
        let subtotal = services + staff;
        let tax = (subtotal * ESTIMATE_TAX_RATE).round_dp(2);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn label(&self) -> &'static str {
        ESTIMATE_LABEL
    }
}

/// What the summary shows for the price
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalsView {
    /// Nothing selected yet
    Pending,
    /// No server answer yet
    Estimated(EstimatedTotal),
    /// Last server answer, verbatim
    Authoritative(PriceBreakdown),
}

/// What started a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingTrigger {
    Address,
    Zone,
    Coupon,
    Slot,
    Services,
}

impl PricingTrigger {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Zone => "zone",
            Self::Coupon => "coupon",
            Self::Slot => "slot",
            Self::Services => "services",
        }
    }
}

/// Result of one recompute call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    /// The response replaced the cached totals
    Applied,
    /// A newer recompute was issued meanwhile; the response was dropped
    Superseded,
}

// ============================================================================
// Reconciler
// ============================================================================

#[derive(Debug, Default)]
struct PricingState {
    totals: Option<PriceBreakdown>,
    warning: Option<String>,
}

/// Cached server totals guarded by a latest-wins sequence
#[derive(Debug, Default)]
pub struct PricingReconciler {
    guard: LatestWins,
    state: Mutex<PricingState>,
}

impl PricingReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied server breakdown
    pub fn totals(&self) -> Option<PriceBreakdown> {
        self.state.lock().totals.clone()
    }

    /// Set when the last recompute failed and `totals` may be stale
    pub fn warning(&self) -> Option<String> {
        self.state.lock().warning.clone()
    }

    pub fn view(&self, draft: &BookingDraft) -> TotalsView {
        if let Some(totals) = self.totals() {
            TotalsView::Authoritative(totals)
        } else if draft.services.is_empty() {
            TotalsView::Pending
        } else {
            TotalsView::Estimated(EstimatedTotal::from_draft(draft))
        }
    }

    /// Build the request for the current draft
    pub fn request(draft: &BookingDraft, zone_id: Option<i64>) -> TotalsRequest {
        TotalsRequest {
            booking_data: draft.clone(),
            zone_id,
            coupon_code: draft.coupon.accepted.clone(),
        }
    }

    /// Ask the server for fresh totals.
    ///
    /// Only the response to the most recently issued call is applied. A
    /// failure keeps the previous totals and records a warning.
    pub async fn recompute<A: BookingApi + ?Sized>(
        &self,
        api: &A,
        request: TotalsRequest,
        trigger: PricingTrigger,
    ) -> ClientResult<Recompute> {
        let ticket = self.guard.issue();
        tracing::debug!(ticket = ticket.value(), trigger = trigger.name(), "Recomputing totals");

        let result = api.booking_totals(&request).await;
        if !self.guard.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "Discarding superseded totals");
            return Ok(Recompute::Superseded);
        }

        let mut state = self.state.lock();
        match result {
            Ok(totals) => {
                state.totals = Some(totals);
                state.warning = None;
                Ok(Recompute::Applied)
            }
            Err(e) => {
                tracing::warn!(error = %e, trigger = trigger.name(), "Totals recompute failed");
                state.warning = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Drop cached totals, e.g. when a new booking attempt starts
    pub fn reset(&self) {
        // Invalidate anything still in flight
        self.guard.issue();
        *self.state.lock() = PricingState::default();
    }
}

// ============================================================================
// Coupon
// ============================================================================

/// Validate `code` with the server and record the verdict.
///
/// On 200 the code becomes the accepted one and is persisted. On any
/// failure the draft carries the error and any persisted coupon is evicted.
pub async fn apply_coupon<A, S>(
    api: &A,
    store: &S,
    draft: &mut BookingDraft,
    code: &str,
    user_id: Option<i64>,
    zone_id: Option<i64>,
) -> ClientResult<()>
where
    A: BookingApi + ?Sized,
    S: SessionStore + ?Sized,
{
    let code = code.trim();
    if code.is_empty() {
        return Err(ClientError::not_allowed("Enter a coupon code"));
    }
    draft.customer_details.coupon_code = Some(code.to_string());

    let request = CouponRequest {
        coupon_code: code.to_string(),
        booking_data: Some(draft.clone()),
        user_id,
        zone_id,
    };
    match api.apply_coupon(&request).await {
        Ok(()) => {
            draft.coupon.accept(code);
            store.set_json(storage_keys::APPLIED_COUPON, code)?;
            tracing::info!(coupon = code, "Coupon accepted");
            Ok(())
        }
        Err(e) => {
            draft.coupon.reject(e.user_message());
            store.remove(storage_keys::APPLIED_COUPON)?;
            tracing::warn!(coupon = code, error = %e, "Coupon rejected");
            Err(e)
        }
    }
}

/// Edit the coupon field. Clearing it also clears any coupon error.
pub fn set_coupon_code(draft: &mut BookingDraft, code: &str) {
    let code = code.trim();
    if code.is_empty() {
        draft.customer_details.coupon_code = None;
        draft.coupon.clear();
    } else {
        draft.customer_details.coupon_code = Some(code.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CreateBookingRequest, GroupsRequest, SlotsRequest};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use shared::models::{OrderIds, Service, ServiceGroup, SlotOption, Staff};
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    /// Totals answered through channels, so tests control arrival order
    #[derive(Default)]
    struct GatedTotals {
        pending: Mutex<VecDeque<oneshot::Receiver<ClientResult<PriceBreakdown>>>>,
        coupon_ok: bool,
    }

    impl GatedTotals {
        fn gate(&self) -> oneshot::Sender<ClientResult<PriceBreakdown>> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl BookingApi for GatedTotals {
        async fn service_groups(&self, _: &GroupsRequest) -> ClientResult<Vec<ServiceGroup>> {
            unimplemented!()
        }

        async fn available_slots(&self, _: &SlotsRequest) -> ClientResult<Vec<SlotOption>> {
            unimplemented!()
        }

        async fn booking_totals(&self, _: &TotalsRequest) -> ClientResult<PriceBreakdown> {
            let rx = self.pending.lock().pop_front().expect("no gate prepared");
            rx.await.expect("gate dropped")
        }

        async fn apply_coupon(&self, _: &CouponRequest) -> ClientResult<()> {
            if self.coupon_ok {
                Ok(())
            } else {
                Err(ClientError::Rejected {
                    status: 400,
                    message: Some("Invalid coupon".into()),
                })
            }
        }

        async fn create_booking(&self, _: &CreateBookingRequest) -> ClientResult<OrderIds> {
            unimplemented!()
        }
    }

    fn breakdown(total: i64) -> PriceBreakdown {
        [("Subtotal", 45_i64), ("Tax", 4), ("Total", total)]
            .into_iter()
            .collect()
    }

    fn draft() -> BookingDraft {
        let mut draft = BookingDraft::default();
        draft.add_service(Service {
            id: 10,
            name: "Haircut".into(),
            image: None,
            price: "$45".into(),
            discount: None,
            duration: None,
            options: Vec::new(),
        });
        draft
    }

    #[test]
    fn test_estimate() {
        let mut draft = draft();
        draft.selected_slots.insert(
            0,
            SlotOption {
                slot: "14:00".into(),
                staff: Staff {
                    id: 4,
                    name: "Omar".into(),
                    image: None,
                    extra_charge: Some(5_i64.into()),
                },
            },
        );
        let estimate = EstimatedTotal::from_draft(&draft);
        assert_eq!(estimate.subtotal(), Decimal::new(50, 0));
        assert_eq!(estimate.tax(), Decimal::new(4, 0));
        assert_eq!(estimate.total(), Decimal::new(54, 0));
        assert_eq!(estimate.label(), "Estimated");
    }

    #[tokio::test]
    async fn test_view_switches_to_server_totals() {
        let api = GatedTotals::default();
        let pricing = PricingReconciler::new();
        assert_eq!(pricing.view(&BookingDraft::default()), TotalsView::Pending);

        let draft = draft();
        assert!(matches!(pricing.view(&draft), TotalsView::Estimated(_)));

        let gate = api.gate();
        gate.send(Ok(breakdown(49))).unwrap();
        let outcome = pricing
            .recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Services)
            .await
            .unwrap();
        assert_eq!(outcome, Recompute::Applied);
        assert_eq!(pricing.view(&draft), TotalsView::Authoritative(breakdown(49)));
    }

    #[tokio::test]
    async fn test_totals_replaced_not_merged() {
        let api = GatedTotals::default();
        let pricing = PricingReconciler::new();
        let draft = draft();

        api.gate().send(Ok(breakdown(49))).unwrap();
        pricing
            .recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Slot)
            .await
            .unwrap();

        let only_total: PriceBreakdown = [("Total", 44_i64)].into_iter().collect();
        api.gate().send(Ok(only_total.clone())).unwrap();
        pricing
            .recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Coupon)
            .await
            .unwrap();

        assert_eq!(pricing.totals(), Some(only_total));
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let api = GatedTotals::default();
        let pricing = PricingReconciler::new();
        let draft = draft();
        let tx_a = api.gate();
        let tx_b = api.gate();

        let a = pricing.recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Address);
        let b = pricing.recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Address);
        let release = async {
            tx_b.send(Ok(breakdown(44))).unwrap();
            tokio::task::yield_now().await;
            tx_a.send(Ok(breakdown(49))).unwrap();
        };
        let (a, b, ()) = tokio::join!(a, b, release);

        assert_eq!(a.unwrap(), Recompute::Superseded);
        assert_eq!(b.unwrap(), Recompute::Applied);
        assert_eq!(pricing.totals(), Some(breakdown(44)));
    }

    #[tokio::test]
    async fn test_failure_keeps_stale_totals_with_warning() {
        let api = GatedTotals::default();
        let pricing = PricingReconciler::new();
        let draft = draft();

        api.gate().send(Ok(breakdown(49))).unwrap();
        pricing
            .recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Zone)
            .await
            .unwrap();

        api.gate()
            .send(Err(ClientError::Rejected {
                status: 422,
                message: Some("Zone not served".into()),
            }))
            .unwrap();
        let result = pricing
            .recompute(&api, PricingReconciler::request(&draft, None), PricingTrigger::Zone)
            .await;

        assert!(result.is_err());
        assert_eq!(pricing.totals(), Some(breakdown(49)));
        assert_eq!(pricing.warning().as_deref(), Some("Zone not served"));
    }

    #[tokio::test]
    async fn test_coupon_accepted_is_persisted() {
        let api = GatedTotals {
            coupon_ok: true,
            ..Default::default()
        };
        let store = MemoryStore::new();
        let mut draft = draft();

        apply_coupon(&api, &store, &mut draft, " SAVE10 ", Some(5), None)
            .await
            .unwrap();

        assert_eq!(draft.coupon.accepted.as_deref(), Some("SAVE10"));
        assert!(draft.coupon_settled());
        assert_eq!(
            store.get_json::<String>(storage_keys::APPLIED_COUPON).as_deref(),
            Some("SAVE10")
        );
    }

    #[tokio::test]
    async fn test_coupon_rejection_evicts_persisted_coupon() {
        let api = GatedTotals::default();
        let store = MemoryStore::new();
        store.set_json(storage_keys::APPLIED_COUPON, "SAVE10").unwrap();
        let mut draft = draft();
        draft.coupon.accept("SAVE10");

        let err = apply_coupon(&api, &store, &mut draft, "SAVE10", None, None)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid coupon");
        assert_eq!(store.get(storage_keys::APPLIED_COUPON), None);
        assert_eq!(draft.coupon.error.as_deref(), Some("Invalid coupon"));
        assert!(!draft.coupon_settled());

        set_coupon_code(&mut draft, "");
        assert!(draft.coupon_settled());
    }

    #[tokio::test]
    async fn test_blank_coupon_never_sent() {
        let api = GatedTotals::default();
        let store = MemoryStore::new();
        let mut draft = draft();
        let err = apply_coupon(&api, &store, &mut draft, "   ", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), shared::ErrorKind::Validation);
        assert!(draft.coupon.error.is_none());
    }
}

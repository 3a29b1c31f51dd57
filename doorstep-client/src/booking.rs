//! Booking session - the wizard wired to the API and the stores
//!
//! Each user action of the booking flow is a method here. Actions that
//! touch the price schedule a recompute; failures are surfaced as the
//! step's inline error and returned, auth expiry is returned untouched so
//! the caller can route it through [`BookingSession::handle_error`].

use chrono::NaiveDate;
use shared::models::{Address, Service, SlotOption, Zone};
use shared::storage_keys;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::account;
use crate::api::{AccountApi, BookingApi, CheckoutApi, CreateBookingRequest};
use crate::auth;
use crate::checkout::CheckoutSession;
use crate::details::{self, DetailsField};
use crate::error::{ClientError, ClientResult};
use crate::grouping::{AvailabilityReconciler, SlotSelection};
use crate::navigation::Navigation;
use crate::pricing::{self, PricingReconciler, PricingTrigger, TotalsView};
use crate::selection::SelectionStore;
use crate::store::{SessionStoreExt, SharedStore};
use crate::wizard::{BookingDraft, BookingWizard, DraftChanges, DraftPatch, Step};

/// One booking attempt from service selection to checkout
pub struct BookingSession<A: ?Sized> {
    api: Arc<A>,
    store: SharedStore,
    selection: SelectionStore,
    wizard: BookingWizard,
    availability: AvailabilityReconciler,
    pricing: PricingReconciler,
    zone: Option<Zone>,
}

impl<A> BookingSession<A>
where
    A: BookingApi + AccountApi + CheckoutApi + ?Sized,
{
    /// Enter the wizard with whatever was picked while browsing
    pub fn from_selection(api: Arc<A>, store: SharedStore) -> Self {
        let selection = SelectionStore::new(store.clone());
        let draft = BookingDraft::from_selection(&selection.entries());
        Self::start(api, store, selection, BookingWizard::new(draft))
    }

    /// "Book now" on a single service: starts at slot selection
    pub fn book_now(api: Arc<A>, store: SharedStore, service: Service) -> Self {
        let selection = SelectionStore::new(store.clone());
        Self::start(api, store, selection, BookingWizard::with_service(service))
    }

    fn start(
        api: Arc<A>,
        store: SharedStore,
        selection: SelectionStore,
        mut wizard: BookingWizard,
    ) -> Self {
        let zone = account::selected_zone(store.as_ref());
        let details = &mut wizard.draft_mut().customer_details;
        details::hydrate(details, store.as_ref());
        if let Some(zone) = &zone {
            details::lock_area(details, zone);
        }
        // A remembered coupon is only a prefill; it is re-validated on submit
        if let Some(code) = store.get_json::<String>(storage_keys::APPLIED_COUPON) {
            details.coupon_code = Some(code);
        }

        Self {
            api,
            store,
            selection,
            wizard,
            availability: AvailabilityReconciler::new(),
            pricing: PricingReconciler::new(),
            zone,
        }
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn draft(&self) -> &BookingDraft {
        self.wizard.draft()
    }

    pub fn step(&self) -> Step {
        self.wizard.current_step()
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn availability(&self) -> &AvailabilityReconciler {
        &self.availability
    }

    pub fn totals(&self) -> TotalsView {
        self.pricing.view(self.wizard.draft())
    }

    /// Set when the shown totals may be stale
    pub fn pricing_warning(&self) -> Option<String> {
        self.pricing.warning()
    }

    pub fn is_authenticated(&self) -> bool {
        auth::is_authenticated(self.store.as_ref())
    }

    fn zone_id(&self) -> Option<i64> {
        self.zone.as_ref().map(|z| z.id)
    }

    fn user_id(&self) -> Option<i64> {
        auth::current_user_id(self.store.as_ref())
    }

    /// Route an auth expiry to the login screen; `None` for anything else
    pub fn handle_error(&self, error: &ClientError) -> Option<Navigation> {
        auth::route_error(self.store.as_ref(), error)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn next(&mut self) -> bool {
        self.wizard.next_step()
    }

    pub fn back(&mut self) -> bool {
        self.wizard.prev_step()
    }

    // ========================================================================
    // Service step
    // ========================================================================

    /// Merge a partial update and reprice if it touched the price
    pub async fn update(&mut self, patch: DraftPatch) -> ClientResult<DraftChanges> {
        let changes = self.wizard.update_booking_data(patch);
        if changes.pricing {
            self.reprice(PricingTrigger::Services).await?;
        }
        Ok(changes)
    }

    pub async fn add_service(&mut self, service: Service) -> ClientResult<bool> {
        if !self.wizard.draft_mut().add_service(service) {
            return Ok(false);
        }
        self.wizard.return_to_slot();
        self.reprice(PricingTrigger::Services).await?;
        Ok(true)
    }

    pub async fn remove_service(&mut self, service_id: i64) -> ClientResult<bool> {
        if !self.wizard.draft_mut().remove_service(service_id) {
            return Ok(false);
        }
        self.wizard.return_to_slot();
        self.reprice(PricingTrigger::Services).await?;
        Ok(true)
    }

    /// Replace the chosen options of one selected service
    pub async fn set_options(&mut self, service_id: i64, options: BTreeSet<i64>) -> ClientResult<()> {
        if !self.draft().has_service(service_id) {
            return Err(ClientError::not_allowed("Service is not part of this booking"));
        }
        let mut all = self.draft().service_options.clone();
        if options.is_empty() {
            all.remove(&service_id);
        } else {
            all.insert(service_id, options);
        }
        self.update(DraftPatch {
            service_options: Some(all),
            ..Default::default()
        })
        .await?;
        Ok(())
    }

    pub async fn toggle_add_on(&mut self, service_id: i64) -> ClientResult<bool> {
        let mut add_ons = self.draft().add_ons.clone();
        let on = if add_ons.remove(&service_id) {
            false
        } else {
            add_ons.insert(service_id);
            true
        };
        self.update(DraftPatch {
            add_ons: Some(add_ons),
            ..Default::default()
        })
        .await?;
        Ok(on)
    }

    // ========================================================================
    // Slot step
    // ========================================================================

    /// Pick the day and load availability for it.
    ///
    /// A new day drops the chosen slots, so the totals are recomputed
    /// without their staff charges.
    pub async fn set_date(&mut self, date: NaiveDate) -> ClientResult<()> {
        let changes = self.wizard.update_booking_data(DraftPatch {
            date: Some(date),
            ..Default::default()
        });
        if changes.pricing {
            self.reprice(PricingTrigger::Slot).await?;
        }
        self.load_availability().await
    }

    /// Fetch groups and slots for the current services and date
    pub async fn load_availability(&mut self) -> ClientResult<()> {
        self.wizard.clear_error(Step::Slot);
        let zone_id = self.zone_id();
        let result = self
            .availability
            .refresh(&*self.api, self.wizard.draft_mut(), zone_id)
            .await;
        if let Err(e) = result {
            self.surface(Step::Slot, &e);
            return Err(e);
        }
        self.wizard.return_to_slot();

        let unavailable = self.availability.unavailable_groups();
        if !unavailable.is_empty() {
            self.wizard.set_error(
                Step::Slot,
                "Some of your services are not available on this date",
            );
        }
        Ok(())
    }

    /// Choose the (slot, staff) pair of one group
    pub async fn select_slot(&mut self, group_index: usize, option: SlotOption) -> ClientResult<SlotSelection> {
        let selection = self
            .availability
            .on_slot_select(self.wizard.draft_mut(), group_index, option)?;
        if selection == SlotSelection::Changed {
            self.reprice(PricingTrigger::Slot).await?;
        }
        Ok(selection)
    }

    // ========================================================================
    // Details step
    // ========================================================================

    pub fn set_field(&mut self, field: DetailsField, value: &str) -> ClientResult<()> {
        self.wizard.clear_error(Step::Details);
        let zone = self.zone.clone();
        details::set_field(
            &mut self.wizard.draft_mut().customer_details,
            zone.as_ref(),
            field,
            value,
        )
    }

    pub async fn select_saved_address(&mut self, address: &Address) -> ClientResult<()> {
        self.wizard.clear_error(Step::Details);
        let zone = self.zone.clone();
        details::select_saved_address(
            &mut self.wizard.draft_mut().customer_details,
            zone.as_ref(),
            address,
        )?;
        self.reprice(PricingTrigger::Address).await
    }

    pub fn set_save_data(&mut self, enabled: bool) -> ClientResult<()> {
        let authenticated = self.is_authenticated();
        details::set_save_data(
            &mut self.wizard.draft_mut().customer_details,
            enabled,
            authenticated,
        )
    }

    /// Edit the coupon field without validating it
    pub fn set_coupon_code(&mut self, code: &str) {
        self.wizard.clear_error(Step::Details);
        pricing::set_coupon_code(self.wizard.draft_mut(), code);
    }

    /// Validate a coupon with the server and reprice with the outcome.
    ///
    /// A rejection drops the previously accepted code, so the totals are
    /// recomputed before the rejection is returned.
    pub async fn apply_coupon(&mut self, code: &str) -> ClientResult<()> {
        self.wizard.clear_error(Step::Details);
        let applied = self.validate_coupon(code).await;
        if let Err(e) = &applied
            && e.is_auth_expired()
        {
            return applied;
        }
        let repriced = self.reprice(PricingTrigger::Coupon).await;
        applied.and(repriced)
    }

    async fn validate_coupon(&mut self, code: &str) -> ClientResult<()> {
        let user_id = self.user_id();
        let zone_id = self.zone_id();
        pricing::apply_coupon(
            &*self.api,
            self.store.as_ref(),
            self.wizard.draft_mut(),
            code,
            user_id,
            zone_id,
        )
        .await
    }

    /// Move to another zone: the area, staff and prices all depend on it
    pub async fn change_zone(&mut self, zone: Zone) -> ClientResult<()> {
        account::select_zone(self.store.as_ref(), &zone)?;
        let draft = self.wizard.draft_mut();
        details::lock_area(&mut draft.customer_details, &zone);
        draft.customer_details.selected_address_id = None;
        draft.invalidate_grouping();
        self.wizard.return_to_slot();
        self.zone = Some(zone);
        self.reprice(PricingTrigger::Zone).await
    }

    /// Validate the form, settle the coupon, optionally save the address,
    /// then advance to the summary.
    ///
    /// Nothing is sent while a required field is blank.
    pub async fn submit_details(&mut self) -> ClientResult<bool> {
        if self.wizard.current_step() != Step::Details {
            return Err(ClientError::not_allowed("Not on the details step"));
        }
        if self.wizard.is_loading() {
            return Err(ClientError::not_allowed("Already submitting"));
        }
        self.wizard.clear_error(Step::Details);

        if let Err(e) = details::validate(&self.draft().customer_details) {
            let e = ClientError::from(e);
            self.surface(Step::Details, &e);
            return Err(e);
        }

        self.wizard.set_loading(true);
        let result = self.settle_details().await;
        self.wizard.set_loading(false);

        match result {
            Ok(()) => Ok(self.wizard.next_step()),
            Err(e) => {
                self.surface(Step::Details, &e);
                Err(e)
            }
        }
    }

    async fn settle_details(&mut self) -> ClientResult<()> {
        let draft = self.wizard.draft();
        if let Some(code) = draft.customer_details.coupon()
            && draft.coupon.accepted.as_deref() != Some(code)
        {
            let code = code.to_string();
            if let Err(e) = self.validate_coupon(&code).await {
                if !e.is_auth_expired() {
                    self.reprice(PricingTrigger::Coupon).await?;
                }
                return Err(e);
            }
        }

        let details = &self.wizard.draft().customer_details;
        if details.save_data && details.selected_address_id.is_none() && self.is_authenticated() {
            self.api.save_address(&details.address).await?;
            tracing::info!("Address saved for later bookings");
        }

        self.reprice(PricingTrigger::Address).await
    }

    // ========================================================================
    // Summary step
    // ========================================================================

    /// Submit the reviewed draft and open checkout for the created orders
    pub async fn confirm_booking(&mut self) -> ClientResult<CheckoutSession> {
        if !self.draft().is_scheduled() {
            self.wizard.return_to_slot();
            return Err(ClientError::not_allowed("Choose a time slot for every service first"));
        }
        if !self.wizard.can_submit() {
            return Err(ClientError::not_allowed("Booking cannot be submitted yet"));
        }
        self.wizard.clear_error(Step::Summary);
        self.wizard.set_loading(true);

        let request = CreateBookingRequest {
            booking_data: self.draft().clone(),
            zone_id: self.zone_id(),
            user_id: self.user_id(),
        };
        let result = self.api.create_booking(&request).await;
        self.wizard.set_loading(false);

        let order_ids = match result {
            Ok(ids) => ids,
            Err(e) => {
                self.surface(Step::Summary, &e);
                return Err(e);
            }
        };
        tracing::info!(
            attempt_id = %self.wizard.attempt_id(),
            orders = %order_ids,
            "Booking created"
        );
        // The orders exist now; a stale selection list must not hide them
        if let Err(e) = self.selection.clear() {
            tracing::warn!(orders = %order_ids, error = %e, "Failed to clear selected services");
        }

        let mut checkout = CheckoutSession::new(order_ids, self.zone_id())?;
        if let Err(e) = checkout.load(&*self.api).await
            && e.is_auth_expired()
        {
            return Err(e);
        }
        Ok(checkout)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Recompute totals; only auth expiry is an error here, anything else
    /// leaves the previous totals with a warning
    async fn reprice(&mut self, trigger: PricingTrigger) -> ClientResult<()> {
        if self.draft().services.is_empty() {
            self.pricing.reset();
            return Ok(());
        }
        let request = PricingReconciler::request(self.draft(), self.zone_id());
        match self.pricing.recompute(&*self.api, request, trigger).await {
            Err(e) if e.is_auth_expired() => Err(e),
            _ => Ok(()),
        }
    }

    fn surface(&mut self, step: Step, error: &ClientError) {
        if error.kind().is_inline() {
            self.wizard.set_error(step, error.user_message());
        }
    }
}


//! Catalog browsing - search and service detail
//!
//! Both fetches run under a [`LatestWins`] guard: typing fast or clicking
//! through services issues overlapping requests, and only the answer to the
//! last one may land.

use parking_lot::Mutex;
use shared::models::{OptionRef, SearchQuery, SelectedService, Service};
use std::collections::BTreeSet;

use crate::api::CatalogApi;
use crate::error::{ClientError, ClientResult};
use crate::latest::LatestWins;
use crate::selection::SelectionStore;

/// Whether a response made it into the controller's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    Applied,
    Superseded,
}

#[derive(Debug, Default)]
struct SearchState {
    query: SearchQuery,
    results: Vec<Service>,
    error: Option<String>,
}

/// Search results for the most recent query
#[derive(Debug, Default)]
pub struct SearchController {
    guard: LatestWins,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> Vec<Service> {
        self.state.lock().results.clone()
    }

    pub fn query(&self) -> SearchQuery {
        self.state.lock().query.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub async fn search<A: CatalogApi + ?Sized>(
        &self,
        api: &A,
        query: SearchQuery,
    ) -> ClientResult<Fetch> {
        let ticket = self.guard.issue();
        let result = api.search(&query).await;
        if !self.guard.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), q = ?query.q, "Discarding superseded search");
            return Ok(Fetch::Superseded);
        }

        let mut state = self.state.lock();
        state.query = query;
        match result {
            Ok(services) => {
                tracing::debug!(results = services.len(), "Search results");
                state.results = services;
                state.error = None;
                Ok(Fetch::Applied)
            }
            Err(e) => {
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}

#[derive(Debug, Default)]
struct DetailState {
    service: Option<Service>,
    options: BTreeSet<i64>,
    add_ons: BTreeSet<i64>,
    error: Option<String>,
}

/// Service detail page: shows one service and collects its options
#[derive(Debug, Default)]
pub struct ServiceDetail {
    guard: LatestWins,
    state: Mutex<DetailState>,
}

impl ServiceDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(&self) -> Option<Service> {
        self.state.lock().service.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Show `service_id`, resetting option choices
    pub async fn open<A: CatalogApi + ?Sized>(&self, api: &A, service_id: i64) -> ClientResult<Fetch> {
        let ticket = self.guard.issue();
        let result = api.service(service_id).await;
        if !self.guard.is_current(ticket) {
            tracing::debug!(service_id, "Discarding superseded service detail");
            return Ok(Fetch::Superseded);
        }

        let mut state = self.state.lock();
        match result {
            Ok(service) => {
                *state = DetailState {
                    service: Some(service),
                    ..Default::default()
                };
                Ok(Fetch::Applied)
            }
            Err(e) => {
                state.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Toggle one of the service's options
    pub fn toggle_option(&self, option_id: i64) -> ClientResult<bool> {
        let mut state = self.state.lock();
        let known = state
            .service
            .as_ref()
            .is_some_and(|s| s.options.iter().any(|o| o.id == option_id));
        if !known {
            return Err(ClientError::not_allowed("Unknown option"));
        }
        let on = if state.options.remove(&option_id) {
            false
        } else {
            state.options.insert(option_id);
            true
        };
        Ok(on)
    }

    /// Toggle an add-on service
    pub fn toggle_add_on(&self, service_id: i64) -> bool {
        let mut state = self.state.lock();
        if state.add_ons.remove(&service_id) {
            false
        } else {
            state.add_ons.insert(service_id);
            true
        }
    }

    /// Put the service with the chosen options into the selection list,
    /// replacing an earlier entry for the same service
    pub fn confirm(&self, selection: &SelectionStore) -> ClientResult<SelectedService> {
        let entry = {
            let state = self.state.lock();
            let Some(service) = state.service.clone() else {
                return Err(ClientError::not_allowed("No service is open"));
            };
            let options = service
                .options
                .iter()
                .filter(|o| state.options.contains(&o.id))
                .map(|o| OptionRef {
                    id: o.id,
                    name: o.name.clone(),
                })
                .collect();
            SelectedService {
                service,
                options,
                add_ons: state.add_ons.iter().copied().collect(),
            }
        };
        selection.upsert(entry.clone())?;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use shared::models::ServiceOption;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct GatedCatalog {
        searches: Mutex<VecDeque<oneshot::Receiver<Vec<Service>>>>,
    }

    #[async_trait]
    impl CatalogApi for GatedCatalog {
        async fn search(&self, _: &SearchQuery) -> ClientResult<Vec<Service>> {
            let rx = self.searches.lock().pop_front().expect("no gate prepared");
            Ok(rx.await.expect("gate dropped"))
        }

        async fn service(&self, service_id: i64) -> ClientResult<Service> {
            let mut service = named(service_id, "Haircut");
            service.options = vec![ServiceOption {
                id: 2,
                name: "Long hair".into(),
                price: Some("$10".into()),
                duration: Some(15),
            }];
            Ok(service)
        }
    }

    fn named(id: i64, name: &str) -> Service {
        Service {
            id,
            name: name.into(),
            image: None,
            price: "$45".into(),
            discount: None,
            duration: None,
            options: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_slow_earlier_search_does_not_overwrite() {
        let api = GatedCatalog::default();
        let (tx_a, rx_a) = oneshot::channel();
        let (tx_b, rx_b) = oneshot::channel();
        api.searches.lock().extend([rx_a, rx_b]);
        let search = SearchController::new();

        let a = search.search(&api, SearchQuery::text("hai"));
        let b = search.search(&api, SearchQuery::text("haircut"));
        let release = async {
            tx_b.send(vec![named(1, "Haircut")]).unwrap();
            tokio::task::yield_now().await;
            tx_a.send(vec![named(2, "Hair dye"), named(3, "Hair wash")]).unwrap();
        };
        let (a, b, ()) = tokio::join!(a, b, release);

        assert_eq!(a.unwrap(), Fetch::Superseded);
        assert_eq!(b.unwrap(), Fetch::Applied);
        assert_eq!(search.results().len(), 1);
        assert_eq!(search.query().q.as_deref(), Some("haircut"));
    }

    #[tokio::test]
    async fn test_confirm_options_into_selection() {
        let api = GatedCatalog::default();
        let selection = SelectionStore::new(Arc::new(MemoryStore::new()));
        let detail = ServiceDetail::new();
        detail.open(&api, 10).await.unwrap();

        assert!(detail.toggle_option(2).unwrap());
        assert!(detail.toggle_option(99).is_err());
        assert!(detail.toggle_add_on(7));

        let entry = detail.confirm(&selection).unwrap();
        assert_eq!(entry.options[0].name, "Long hair");
        assert_eq!(entry.add_ons, vec![7]);

        // Confirming again replaces the entry for the same service
        detail.toggle_option(2).unwrap();
        detail.confirm(&selection).unwrap();
        let entries = selection.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].options.is_empty());
    }
}

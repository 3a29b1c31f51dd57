//! Selection store - services picked while browsing, before the wizard
//!
//! Persisted under [`storage_keys::SELECTED_SERVICES`] as a JSON array and
//! re-read on every access, so writes from another handle are never hidden
//! behind a cached copy. Subscribers follow the session store's change feed
//! and get the new entry count after every change (the header badge),
//! whichever handle made it.

use shared::models::SelectedService;
use shared::storage_keys;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::error::ClientResult;
use crate::store::{SessionStoreExt, SharedStore, StoreChange};

/// Published after every change to the selection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged {
    pub count: usize,
}

/// Selection changes seen through the session store.
///
/// Other keys are skipped. After a lag the current count is reported.
pub struct SelectionEvents {
    changes: broadcast::Receiver<StoreChange>,
    store: SharedStore,
}

impl SelectionEvents {
    pub async fn recv(&mut self) -> Result<SelectionChanged, RecvError> {
        loop {
            match self.changes.recv().await {
                Ok(change) => {
                    if let Some(event) = Self::decode(&change) {
                        return Ok(event);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Selection events lagged");
                    return Ok(self.current());
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn try_recv(&mut self) -> Result<SelectionChanged, TryRecvError> {
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    if let Some(event) = Self::decode(&change) {
                        return Ok(event);
                    }
                }
                Err(TryRecvError::Lagged(_)) => return Ok(self.current()),
                Err(e) => return Err(e),
            }
        }
    }

    fn decode(change: &StoreChange) -> Option<SelectionChanged> {
        if change.key != storage_keys::SELECTED_SERVICES {
            return None;
        }
        let count = change
            .value
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<SelectedService>>(raw).ok())
            .map_or(0, |entries| entries.len());
        Some(SelectionChanged { count })
    }

    fn current(&self) -> SelectionChanged {
        let count = self
            .store
            .get_json::<Vec<SelectedService>>(storage_keys::SELECTED_SERVICES)
            .map_or(0, |entries| entries.len());
        SelectionChanged { count }
    }
}

/// Pre-wizard selection list with change notifications
#[derive(Clone)]
pub struct SelectionStore {
    store: SharedStore,
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("count", &self.count())
            .finish()
    }
}

impl SelectionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Current entries, in the order they were first added
    pub fn entries(&self) -> Vec<SelectedService> {
        self.store
            .get_json(storage_keys::SELECTED_SERVICES)
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.entries().len()
    }

    pub fn contains(&self, service_id: i64) -> bool {
        self.entries().iter().any(|e| e.id() == service_id)
    }

    /// Add `entry`, or replace the entry with the same service id in place
    pub fn upsert(&self, entry: SelectedService) -> ClientResult<()> {
        let mut entries = self.entries();
        match entries.iter_mut().find(|e| e.id() == entry.id()) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        self.write(entries)
    }

    /// Drop the entry for `service_id`; `false` if there was none
    pub fn remove(&self, service_id: i64) -> ClientResult<bool> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|e| e.id() != service_id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write(entries)?;
        Ok(true)
    }

    /// Empty the list once a booking has consumed it
    pub fn clear(&self) -> ClientResult<()> {
        self.store.remove(storage_keys::SELECTED_SERVICES)?;
        tracing::debug!("Selection cleared");
        Ok(())
    }

    /// Follow changes made through any handle on the same session store
    pub fn subscribe(&self) -> SelectionEvents {
        SelectionEvents {
            changes: self.store.subscribe(),
            store: self.store.clone(),
        }
    }

    fn write(&self, entries: Vec<SelectedService>) -> ClientResult<()> {
        self.store
            .set_json(storage_keys::SELECTED_SERVICES, &entries)?;
        tracing::debug!(count = entries.len(), "Selection changed");
        Ok(())
    }
}

//! Session store - persisted client-side state
//!
//! The only shared mutable resource of the client: session token, selected
//! zone, the pre-wizard selection list, cached profile and the last applied
//! coupon. Values are JSON documents keyed by [`shared::storage_keys`].
//! Last writer wins; readers that derive state from a key subscribe to
//! [`SessionStore::subscribe`] instead of caching a copy.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::ClientResult;

/// Capacity of the change notification channel
pub(crate) const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification that a key was written or removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub key: String,
    /// Raw JSON text written, `None` after a removal
    pub value: Option<String>,
}

/// Key/value storage injected into every component that persists state
pub trait SessionStore: Send + Sync {
    /// Raw JSON text stored under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Store raw JSON text under `key`, notifying subscribers
    fn set(&self, key: &str, value: String) -> ClientResult<()>;

    /// Remove `key`; notifies subscribers only if it was present
    fn remove(&self, key: &str) -> ClientResult<()>;

    /// Receive a [`StoreChange`] for every subsequent write or removal
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

/// Shared handle to a session store
pub type SharedStore = Arc<dyn SessionStore>;

/// Typed JSON access on top of [`SessionStore`]
pub trait SessionStoreExt: SessionStore {
    /// Decode the value under `key`; unreadable values count as absent
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring unreadable stored value");
                None
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> ClientResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw)
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

//! In-memory session store

use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::{CHANGE_CHANNEL_CAPACITY, SessionStore, StoreChange};
use crate::error::ClientResult;

/// Session store living only as long as the process
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            data: RwLock::new(HashMap::new()),
            changes,
        }
    }

    fn notify(&self, key: &str, value: Option<String>) {
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            value,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> ClientResult<()> {
        self.data.write().insert(key.to_string(), value.clone());
        self.notify(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let removed = self.data.write().remove(key).is_some();
        if removed {
            self.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

//! File-backed session store
//!
//! One JSON object on disk, loaded on open and rewritten on every change.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

use super::{CHANGE_CHANNEL_CAPACITY, SessionStore, StoreChange};
use crate::error::{ClientError, ClientResult};

/// Session store persisted to a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<BTreeMap<String, String>>,
    changes: broadcast::Sender<StoreChange>,
}

impl FileStore {
    /// Open the store at `path`, creating it lazily on first write.
    ///
    /// A corrupt file is treated as empty and overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| ClientError::Store(format!("read {}: {e}", path.display())))?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Session file unreadable, starting empty");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            path,
            data: RwLock::new(data),
            changes,
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ClientError::Store(format!("create {}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)
            .map_err(|e| ClientError::Store(format!("write {}: {e}", self.path.display())))
    }

    fn notify(&self, key: &str, value: Option<String>) {
        let _ = self.changes.send(StoreChange {
            key: key.to_string(),
            value,
        });
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// The in-memory view only changes once the file has been written
    fn set(&self, key: &str, value: String) -> ClientResult<()> {
        {
            let mut data = self.data.write();
            let mut next = data.clone();
            next.insert(key.to_string(), value.clone());
            self.persist(&next)?;
            *data = next;
        }
        self.notify(key, Some(value));
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        {
            let mut data = self.data.write();
            if !data.contains_key(key) {
                return Ok(());
            }
            let mut next = data.clone();
            next.remove(key);
            self.persist(&next)?;
            *data = next;
        }
        self.notify(key, None);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SessionStoreExt;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set_json("zone_name", "Marina").unwrap();
        store.set_json("zone_id", &3_i64).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get_json::<String>("zone_name").as_deref(), Some("Marina"));
        assert_eq!(reopened.get_json::<i64>("zone_id"), Some(3));
    }

    #[test]
    fn test_remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path).unwrap();
        store.set_json("applied_coupon", "SAVE10").unwrap();
        store.remove("applied_coupon").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert!(reopened.get("applied_coupon").is_none());
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::open(&path).unwrap();
        store.set_json("zone_name", "Marina").unwrap();
        let mut rx = store.subscribe();

        // A directory where the file should be makes every write fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = store.set_json("zone_name", "Deira").unwrap_err();
        assert!(matches!(err, ClientError::Store(_)));
        assert_eq!(store.get_json::<String>("zone_name").as_deref(), Some("Marina"));

        assert!(store.remove("zone_name").is_err());
        assert!(store.get("zone_name").is_some());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.get("token").is_none());
    }
}

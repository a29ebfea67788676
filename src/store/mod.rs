pub mod disk;
pub mod memory;

use crate::core::kv::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::debug;

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens a store whose persistent collections live under `data_path`.
    ///
    /// If the keyspace cannot be opened, persistent collections are unavailable
    /// and `get_collection(.., persist = true, ..)` returns `None`.
    pub fn open(data_path: &Path) -> Self {
        let keyspace = match fjall::Config::new(data_path.join("store")).open() {
            Ok(keyspace) => Some(Arc::new(keyspace)),
            Err(e) => {
                debug!("Failed to open keyspace at {}: {}", data_path.display(), e);
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    /// A store with no disk backing.
    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    fn create_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>> {
        if !persist {
            return Some(Arc::new(MemoryCollection::new()));
        }
        let keyspace = self.keyspace.as_ref()?;
        match keyspace.open_partition(name, PartitionCreateOptions::default()) {
            Ok(partition) => Some(Arc::new(DiskCollection::new(
                Arc::clone(keyspace),
                partition,
            ))),
            Err(e) => {
                debug!("Failed to open partition {}: {}", name, e);
                None
            }
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if let Some(existing) = self
            .collections
            .read()
            .ok()
            .and_then(|collections| collections.get(name).cloned())
        {
            return Some(existing);
        }
        if !create_if_missing {
            return None;
        }

        let collection = self.create_collection(name, persist)?;
        let mut collections = self.collections.write().ok()?;
        Some(
            collections
                .entry(name.to_string())
                .or_insert(collection)
                .clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_collection_is_shared_by_name() {
        let store = KeyValueStore::in_memory();
        let first = store.get_collection("prefs", false, true).unwrap();
        first.put(b"k", b"v".to_vec()).await.unwrap();

        let second = store.get_collection("prefs", false, false).unwrap();
        assert_eq!(second.get(b"k").await, Some(b"v".to_vec()));
    }

    #[test]
    fn test_missing_collection_without_create() {
        let store = KeyValueStore::in_memory();
        assert!(store.get_collection("prefs", false, false).is_none());
    }

    #[test]
    fn test_persistent_collection_needs_keyspace() {
        let store = KeyValueStore::in_memory();
        assert!(store.get_collection("prefs", true, true).is_none());
    }

    #[tokio::test]
    async fn test_persistent_collection_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = KeyValueStore::open(dir.path());
        let collection = store.get_collection("prefs", true, true).unwrap();
        collection.put(b"k", b"v".to_vec()).await.unwrap();
        assert_eq!(collection.get(b"k").await, Some(b"v".to_vec()));
    }
}

use crate::core::kv::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory collection, dropped with the process.
#[derive(Default)]
pub struct MemoryCollection {
    inner: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueCollection for MemoryCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        let entries = self.inner.lock().await;
        let value = entries.get(key).cloned();
        if value.is_some() {
            debug!("Memory HIT for key: {:?}", String::from_utf8_lossy(key));
        } else {
            debug!("Memory MISS for key: {:?}", String::from_utf8_lossy(key));
        }
        value
    }

    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        let mut entries = self.inner.lock().await;
        debug!("Memory PUT for key: {:?}", String::from_utf8_lossy(key));
        entries.insert(key.to_vec(), value);
        Ok(())
    }
}

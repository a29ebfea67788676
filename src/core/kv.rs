//! Key-value storage abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A named collection of raw byte keys and values.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    async fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()>;
}

/// Hands out collections by name, either in memory or persisted to disk.
pub trait Store: Send + Sync {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;
}

//! Persisted dark-mode preference.

use crate::core::kv::{KeyValueCollection, Store};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

const PREFERENCES_COLLECTION: &str = "preferences";
const DARK_MODE_KEY: &[u8] = b"darkMode";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark { Theme::Dark } else { Theme::Light }
    }
}

pub struct ThemePreference {
    collection: Arc<dyn KeyValueCollection>,
}

impl ThemePreference {
    pub fn new(collection: Arc<dyn KeyValueCollection>) -> Self {
        Self { collection }
    }

    pub fn from_store(store: &dyn Store, persist: bool) -> Result<Self> {
        let collection = store
            .get_collection(PREFERENCES_COLLECTION, persist, true)
            .context("Could not open the preferences collection")?;
        Ok(Self::new(collection))
    }

    /// Stored flag, `false` when unset or unreadable.
    pub async fn is_dark(&self) -> bool {
        let Some(raw) = self.collection.get(DARK_MODE_KEY).await else {
            return false;
        };
        serde_json::from_slice(&raw).unwrap_or_else(|e| {
            debug!("Ignoring unreadable dark mode flag: {}", e);
            false
        })
    }

    pub async fn theme(&self) -> Theme {
        Theme::from_dark(self.is_dark().await)
    }

    pub async fn set_dark(&self, is_dark: bool) -> Result<()> {
        let raw = serde_json::to_vec(&is_dark)?;
        self.collection
            .put(DARK_MODE_KEY, raw)
            .await
            .context("Failed to save the theme preference")
    }

    /// Flips the flag, writes it back and returns the new value.
    pub async fn toggle(&self) -> Result<bool> {
        let next = !self.is_dark().await;
        self.set_dark(next).await?;
        Ok(next)
    }
}

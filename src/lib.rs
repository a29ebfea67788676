pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

pub use crate::core::config;

use crate::core::config::AppConfig;
use crate::core::coordinator::RefreshCoordinator;
use crate::core::rates::RateSource;
use crate::core::theme::ThemePreference;
use crate::providers::OpenExchangeRateProvider;
use crate::store::KeyValueStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Rates { base: Option<String> },
    Search { query: String },
    Watch,
    Theme { toggle: bool },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxwatch starting...");

    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let preference = open_preferences(&config)?;
    let theme = preference.theme().await;

    match command {
        AppCommand::Rates { base } => {
            if let Some(base) = base {
                config.base_currency = base.to_uppercase();
            }
            let session = config.build_session()?;
            cli::rates::run(session, rate_source(&config), theme).await
        }
        AppCommand::Search { query } => cli::search::run(&query, theme),
        AppCommand::Watch => {
            let session = config.build_session()?;
            let handle = RefreshCoordinator::spawn(session, rate_source(&config));
            cli::dashboard::run(handle, &preference).await
        }
        AppCommand::Theme { toggle } => cli::theme::run(&preference, toggle).await,
    }
}

fn rate_source(config: &AppConfig) -> Arc<dyn RateSource> {
    Arc::new(OpenExchangeRateProvider::new(config.exchange_rate_url()))
}

/// Theme preference from the on-disk store, or a session-only one if the store is unavailable.
fn open_preferences(config: &AppConfig) -> Result<ThemePreference> {
    let data_path = config.default_data_path()?;
    let store = KeyValueStore::open(&data_path);
    ThemePreference::from_store(&store, true).or_else(|e| {
        warn!("Theme preference will not be saved: {e}");
        ThemePreference::from_store(&store, false)
    })
}

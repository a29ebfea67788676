use crate::core::catalog::{self, CurrencyRecord};
use crate::core::session::{DEFAULT_BASE_CURRENCY, DEFAULT_TRACKED_CODES, Session};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://open.er-api.com/v6/latest";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
            }),
        }
    }
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

fn default_tracked() -> Vec<String> {
    DEFAULT_TRACKED_CODES.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_tracked")]
    pub tracked: Vec<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            tracked: default_tracked(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxwatch", "fxwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "fxwatch", "fxwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn exchange_rate_url(&self) -> &str {
        self.providers
            .exchange_rate
            .as_ref()
            .map_or(DEFAULT_EXCHANGE_RATE_URL, |p| p.base_url.as_str())
    }

    /// Builds the startup session from the configured base and tracked codes.
    pub fn build_session(&self) -> Result<Session> {
        let base = resolve(&self.base_currency)?;

        let mut tracked: Vec<&'static CurrencyRecord> = Vec::new();
        for code in &self.tracked {
            let record = resolve(code)?;
            if record.code == base.code {
                warn!("Skipping tracked currency {} because it is the base", code);
                continue;
            }
            if tracked.iter().any(|r| r.code == record.code) {
                debug!("Skipping duplicate tracked currency {}", code);
                continue;
            }
            tracked.push(record);
        }

        Ok(Session::new(base.code, tracked))
    }
}

fn resolve(code: &str) -> Result<&'static CurrencyRecord> {
    catalog::lookup(code).with_context(|| format!("Unknown currency code: {code}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
base_currency: "EUR"
tracked:
  - "USD"
  - "CHF"
providers:
  exchange_rate:
    base_url: "http://example.com/latest"
data_path: "/tmp/fxwatch"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "EUR");
        assert_eq!(config.tracked, vec!["USD".to_string(), "CHF".to_string()]);
        assert_eq!(config.exchange_rate_url(), "http://example.com/latest");
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/fxwatch")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.tracked.len(), 5);
        assert_eq!(config.exchange_rate_url(), DEFAULT_EXCHANGE_RATE_URL);
    }

    #[test]
    fn test_build_session_from_defaults() {
        let session = AppConfig::default().build_session().unwrap();
        assert_eq!(session.base_currency_code(), "USD");
        let codes: Vec<_> = session.tracked().iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["EUR", "GBP", "JPY", "AUD", "CAD"]);
    }

    #[test]
    fn test_build_session_skips_base_and_duplicates() {
        let config = AppConfig {
            base_currency: "EUR".to_string(),
            tracked: vec!["USD".into(), "EUR".into(), "USD".into(), "INR".into()],
            ..AppConfig::default()
        };
        let session = config.build_session().unwrap();
        let codes: Vec<_> = session.tracked().iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec!["USD", "INR"]);
    }

    #[test]
    fn test_build_session_rejects_unknown_code() {
        let config = AppConfig {
            tracked: vec!["XYZ".into()],
            ..AppConfig::default()
        };
        let err = config.build_session().unwrap_err();
        assert!(err.to_string().contains("Unknown currency code: XYZ"));
    }

    #[test]
    fn test_example_config_is_valid() {
        let example = include_str!("../../docs/example_config.yaml");
        let config: AppConfig = serde_yaml::from_str(example).expect("Example config should parse");
        assert!(config.build_session().is_ok());
    }
}

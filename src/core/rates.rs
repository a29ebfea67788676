//! Exchange rate snapshots and the source abstraction that produces them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Message shown to the user whenever an explicit refresh fails.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch exchange rates. Please try again.";

/// Rates for every target currency, quoted as units per 1 unit of `base_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base_code: String,
    pub rates: HashMap<String, f64>,
    pub fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(
        base_code: impl Into<String>,
        rates: HashMap<String, f64>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            base_code: base_code.into(),
            rates,
            fetched_at,
        }
    }

    /// Usable rate for `code`. Zero, negative and non-finite values count as missing.
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}

#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("Request error for base {base}: {message}")]
    Transport { base: String, message: String },

    #[error("HTTP error: {status} for base {base}")]
    Status { base: String, status: u16 },

    #[error("Upstream reported failure for base {base}: {reason}")]
    Upstream { base: String, reason: String },

    #[error("Failed to parse rate response for {base}: {message}")]
    Malformed { base: String, message: String },
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the full rate table for `base_code`. One request per call, no retries.
    async fn fetch_rates(&self, base_code: &str) -> Result<RateSnapshot, RateFetchError>;
}

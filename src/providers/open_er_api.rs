use crate::core::rates::{RateFetchError, RateSnapshot, RateSource};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const SUCCESS_RESULT: &str = "success";

/// Rate source for the open exchange-rate API (`GET {base_url}/{base_code}`).
pub struct OpenExchangeRateProvider {
    base_url: String,
}

impl OpenExchangeRateProvider {
    pub fn new(base_url: &str) -> Self {
        OpenExchangeRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    base_code: Option<String>,
    rates: Option<HashMap<String, f64>>,
    #[serde(rename = "error-type", alias = "error")]
    error_type: Option<String>,
}

#[async_trait]
impl RateSource for OpenExchangeRateProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base = %base_code))]
    async fn fetch_rates(&self, base_code: &str) -> Result<RateSnapshot, RateFetchError> {
        let url = format!("{}/{}", self.base_url, base_code);
        debug!("Requesting exchange rates from {}", url);

        let transport = |e: reqwest::Error| RateFetchError::Transport {
            base: base_code.to_string(),
            message: e.to_string(),
        };

        let client = reqwest::Client::builder()
            .user_agent("fxwatch/1.0")
            .build()
            .map_err(transport)?;
        let response = client.get(&url).send().await.map_err(transport)?;

        if !response.status().is_success() {
            return Err(RateFetchError::Status {
                base: base_code.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(transport)?;
        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| RateFetchError::Malformed {
                base: base_code.to_string(),
                message: e.to_string(),
            })?;

        if data.result != SUCCESS_RESULT {
            return Err(RateFetchError::Upstream {
                base: base_code.to_string(),
                reason: data.error_type.unwrap_or(data.result),
            });
        }

        let Some(rates) = data.rates else {
            return Err(RateFetchError::Malformed {
                base: base_code.to_string(),
                message: "missing rates in successful response".to_string(),
            });
        };

        debug!(count = rates.len(), "Received exchange rates");
        Ok(RateSnapshot::new(
            data.base_code.unwrap_or_else(|| base_code.to_string()),
            rates,
            Utc::now(),
        ))
    }
}

//! Alpha Vantage `GLOBAL_QUOTE` source.
//!
//! Uses a blocking `reqwest` client with a request timeout, so a slow or dead
//! upstream costs at most one timeout per poll. The observation time is taken
//! from the injected clock when the response arrives.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::warn;
use price_common::{PriceError, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::clock::Clock;
use crate::model::Tick;
use crate::sources::PriceSource;

/// Public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`AlphaVantageSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaVantageConfig {
    /// API key sent as `apikey`.
    pub api_key: String,
    /// Query endpoint.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl AlphaVantageConfig {
    /// Settings for the public endpoint with `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Live quotes from Alpha Vantage.
pub struct AlphaVantageSource {
    client: Client,
    config: AlphaVantageConfig,
    clock: Arc<dyn Clock>,
}

impl AlphaVantageSource {
    /// Display name, also used as the tick's source.
    pub const NAME: &'static str = "AlphaVantage";

    /// Build the source and its HTTP client.
    pub fn new(config: AlphaVantageConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PriceError::source_failure(Self::NAME, e.to_string()))?;
        Ok(Self {
            client,
            config,
            clock,
        })
    }

    fn fetch(&self, symbol: &str) -> Result<Tick> {
        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .map_err(|e| PriceError::source_failure(Self::NAME, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::source_failure(
                Self::NAME,
                format!("unexpected HTTP status {}", status),
            ));
        }

        let body: Value = response
            .json()
            .map_err(|e| PriceError::source_failure(Self::NAME, e.to_string()))?;
        parse_global_quote(symbol, &body, self.clock.now())
    }
}

impl PriceSource for AlphaVantageSource {
    fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        if symbol.trim().is_empty() {
            return None;
        }
        match self.fetch(symbol) {
            Ok(tick) => Some(tick),
            Err(e) => {
                warn!("No tick from {} for symbol={}: {}", Self::NAME, symbol, e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Extract a tick from a `GLOBAL_QUOTE` response body.
///
/// The price lives at `"Global Quote" -> "05. price"` as a decimal string.
/// Rate-limit notices and unknown symbols come back without it and are errors.
pub fn parse_global_quote(symbol: &str, body: &Value, observed_at: DateTime<Utc>) -> Result<Tick> {
    let raw = body
        .get("Global Quote")
        .and_then(|quote| quote.get("05. price"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PriceError::source_failure(
                AlphaVantageSource::NAME,
                "response has no Global Quote price",
            )
        })?;
    let price: f64 = raw.trim().parse().map_err(|e| {
        PriceError::source_failure(AlphaVantageSource::NAME, format!("bad price {:?}: {}", raw, e))
    })?;
    Ok(Tick::new(symbol, price, observed_at, AlphaVantageSource::NAME))
}

//! Public currency-conversion API provider.
//!
//! Talks to endpoints in the style of `exchangerate-api.com`'s v4 API:
//! `GET {base_url}/{BASE}` answers with every rate quoted against `BASE`,
//!
//! ```json
//! { "base": "CNY", "date": "2026-10-17", "rates": { "USD": 0.1389, "EUR": 0.1281 } }
//! ```
//!
//! and the provider picks the requested quote currency out of `rates`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::RateError;
use crate::models::ExchangeRate;
use crate::provider::{build_client, get_body, positive_rate, RateProvider, REQUEST_TIMEOUT};

/// Provider ID constant
const PROVIDER_ID: &str = "EXCHANGE_RATE_API";

/// Default public endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Latest-rates response; other fields (`base`, `date`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

/// Provider backed by a public latest-rates endpoint.
pub struct ExchangeRateApiProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn latest_url(&self, base: &str) -> String {
        format!("{}/{}", self.base_url, base)
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Extracts the `quote` rate from a latest-rates body.
pub fn parse_latest_rates(body: &str, quote: &str) -> Result<Decimal, RateError> {
    let response: LatestRatesResponse =
        serde_json::from_str(body).map_err(|e| RateError::MalformedPayload {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;

    let raw = response
        .rates
        .get(quote)
        .ok_or_else(|| RateError::MissingRate {
            provider: PROVIDER_ID.to_string(),
            currency: quote.to_string(),
        })?;

    positive_rate(PROVIDER_ID, *raw)
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate, RateError> {
        let url = self.latest_url(base);
        debug!("Fetching {}/{} from {}", base, quote, url);

        let body = get_body(&self.client, PROVIDER_ID, &url, &[]).await?;
        let rate = parse_latest_rates(&body, quote)?;

        ExchangeRate::new(base, quote, rate, PROVIDER_ID)
    }
}

//! Internal rate-proxy provider.
//!
//! The quoting backend exposes a small proxy that resolves one pair per call:
//! `GET {url}?from=CNY&to=USD` answers `{ "rate": 0.1389 }`.

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
const PROVIDER_ID: &str = "RATE_PROXY";

#[derive(Debug, Deserialize)]
struct ProxyRateResponse {
    rate: Option<f64>,
}

pub struct ProxyRateProvider {
    client: Client,
    url: String,
}

impl ProxyRateProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            url: url.into(),
        }
    }
}

/// Extracts the rate from a proxy body. `to` only labels the error.
pub fn parse_proxy_rate(body: &str, to: &str) -> Result<Decimal, RateError> {
    let response: ProxyRateResponse =
        serde_json::from_str(body).map_err(|e| RateError::MalformedPayload {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })?;

    let raw = response.rate.ok_or_else(|| RateError::MissingRate {
        provider: PROVIDER_ID.to_string(),
        currency: to.to_string(),
    })?;

    positive_rate(PROVIDER_ID, raw)
}

#[async_trait]
impl RateProvider for ProxyRateProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate, RateError> {
        debug!("Fetching {}/{} from proxy {}", base, quote, self.url);

        let body = get_body(
            &self.client,
            PROVIDER_ID,
            &self.url,
            &[("from", base), ("to", quote)],
        )
        .await?;
        let rate = parse_proxy_rate(&body, quote)?;

        ExchangeRate::new(base, quote, rate, PROVIDER_ID)
    }
}

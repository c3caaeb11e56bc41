//! Exchange-rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RateProvider` trait that all providers implement
//! - `ExchangeRateApiProvider`, for public endpoints answering `{ "rates": { "USD": n } }`
//! - `ProxyRateProvider`, for an internal proxy answering `{ "rate": n }`

mod traits;

pub mod exchange_rate_api;
pub mod proxy;

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;

use crate::errors::RateError;

pub use traits::RateProvider;

/// Default HTTP request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Converts a JSON number into a positive decimal rate.
pub(crate) fn positive_rate(provider: &str, raw: f64) -> Result<Decimal, RateError> {
    if !raw.is_finite() || raw <= 0.0 {
        return Err(RateError::NonPositiveRate {
            provider: provider.to_string(),
            rate: raw.to_string(),
        });
    }
    // f64's Display is the shortest round-tripping form, so 0.1389 stays 0.1389.
    Decimal::from_str(&raw.to_string()).map_err(|e| RateError::MalformedPayload {
        provider: provider.to_string(),
        message: format!("Failed to convert rate to decimal: {}", e),
    })
}

/// Sends a GET and returns the body of a 2xx response.
pub(crate) async fn get_body(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, RateError> {
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RateError::HttpStatus {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

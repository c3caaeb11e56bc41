//! Error types for the exchange-rate providers.
//!
//! Every failure to obtain a usable rate maps onto [`RateError`]. Callers
//! that cache rates (the pricing engine's rate cache) absorb these errors and
//! keep serving their last good value, so the variants only need to carry
//! enough detail for a human-readable message and a log line.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while fetching an exchange rate.
#[derive(Error, Debug)]
pub enum RateError {
    /// The HTTP request could not be sent or the body could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status code.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that answered
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body did not have the expected JSON shape.
    #[error("Malformed payload from {provider}: {message}")]
    MalformedPayload {
        /// The provider that returned the payload
        provider: String,
        /// Parser or conversion message
        message: String,
    },

    /// The payload parsed, but the requested currency was absent.
    #[error("Rate for {currency} missing from {provider} response")]
    MissingRate {
        /// The provider that returned the payload
        provider: String,
        /// The currency that was asked for
        currency: String,
    },

    /// The provider returned a zero, negative or non-finite rate.
    #[error("Non-positive rate {rate} from {provider}")]
    NonPositiveRate {
        /// The provider that returned the rate
        provider: String,
        /// The offending value as received
        rate: String,
    },
}

impl RateError {
    /// Returns true when a later attempt could plausibly succeed.
    ///
    /// Network failures and 5xx/429 responses are transient. Payload problems
    /// mean the endpoint is misconfigured or changed shape, which a retry will
    /// not fix.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::MalformedPayload { .. }
            | Self::MissingRate { .. }
            | Self::NonPositiveRate { .. } => false,
        }
    }

    pub(crate) fn non_positive(provider: &str, rate: Decimal) -> Self {
        Self::NonPositiveRate {
            provider: provider.to_string(),
            rate: rate.to_string(),
        }
    }
}

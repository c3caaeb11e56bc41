use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::RateError;

/// One reading of the price of `base` expressed in `quote`.
///
/// `1 base = rate quote`, so a CNY→USD rate of `0.14` converts 100 CNY into
/// 14 USD. The rate is always strictly positive; [`ExchangeRate::new`]
/// enforces that for provider readings and [`ExchangeRate::fallback`] is only
/// fed configured constants that were validated at load time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub base: String,
    pub quote: String,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    /// Provider id, or [`ExchangeRate::FALLBACK_SOURCE`] for the built-in constant.
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    pub const FALLBACK_SOURCE: &'static str = "FALLBACK";

    /// Creates a provider reading, rejecting zero and negative rates.
    pub fn new(base: &str, quote: &str, rate: Decimal, source: &str) -> Result<Self, RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::non_positive(source, rate));
        }
        Ok(Self {
            base: base.to_string(),
            quote: quote.to_string(),
            rate,
            source: source.to_string(),
            timestamp: Utc::now(),
        })
    }

    /// Creates the conservative reading used before any fetch succeeds.
    pub fn fallback(base: &str, quote: &str, rate: Decimal) -> Self {
        Self {
            base: base.to_string(),
            quote: quote.to_string(),
            rate,
            source: Self::FALLBACK_SOURCE.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Self::FALLBACK_SOURCE
    }

    /// Returns the pair key, e.g. "CNY/USD".
    pub fn pair_key(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    /// Converts an amount in `base` into `quote`, saturating at the `Decimal` bounds.
    pub fn convert(&self, amount: Decimal) -> Decimal {
        amount.saturating_mul(self.rate)
    }
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(6);
    serializer.serialize_str(&rounded.to_string())
}

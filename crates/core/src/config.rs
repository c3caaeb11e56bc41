//! Pricing engine configuration.
//!
//! Values come from `PCBQ_*` environment variables; anything unset keeps the
//! shipped default. The binary loads a `.env` file before calling
//! [`PricingConfig::from_env`].

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use pcbquote_rates::{
    provider::exchange_rate_api::DEFAULT_BASE_URL, ExchangeRate, ExchangeRateApiProvider,
    ProxyRateProvider, RateProvider,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_FALLBACK_RATE, DEFAULT_QUOTE_CURRENCY};
use crate::errors::{Error, Result};

pub const ENV_RATE_PROVIDER: &str = "PCBQ_RATE_PROVIDER";
pub const ENV_RATE_ENDPOINT: &str = "PCBQ_RATE_ENDPOINT";
pub const ENV_BASE_CURRENCY: &str = "PCBQ_BASE_CURRENCY";
pub const ENV_QUOTE_CURRENCY: &str = "PCBQ_QUOTE_CURRENCY";
pub const ENV_FALLBACK_RATE: &str = "PCBQ_FALLBACK_RATE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PCBQ_REQUEST_TIMEOUT_SECS";

/// Which kind of endpoint `rate_endpoint` points at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateProviderKind {
    /// Public latest-rates API, `{ "rates": { "USD": n } }`.
    #[default]
    Public,
    /// Internal proxy, `{ "rate": n }`.
    Proxy,
}

impl FromStr for RateProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "proxy" => Ok(Self::Proxy),
            other => Err(Error::InvalidConfigValue(format!(
                "{}: expected 'public' or 'proxy', got '{}'",
                ENV_RATE_PROVIDER, other
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    pub rate_provider: RateProviderKind,
    pub rate_endpoint: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub fallback_rate: Decimal,
    pub request_timeout_secs: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rate_provider: RateProviderKind::Public,
            rate_endpoint: DEFAULT_BASE_URL.to_string(),
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            quote_currency: DEFAULT_QUOTE_CURRENCY.to_string(),
            fallback_rate: DEFAULT_FALLBACK_RATE,
            request_timeout_secs: pcbquote_rates::REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl PricingConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(kind) = get(ENV_RATE_PROVIDER) {
            config.rate_provider = kind.parse()?;
        }
        if let Some(endpoint) = get(ENV_RATE_ENDPOINT) {
            config.rate_endpoint = endpoint.trim().to_string();
        }
        if let Some(base) = get(ENV_BASE_CURRENCY) {
            config.base_currency = base.trim().to_ascii_uppercase();
        }
        if let Some(quote) = get(ENV_QUOTE_CURRENCY) {
            config.quote_currency = quote.trim().to_ascii_uppercase();
        }
        if let Some(rate) = get(ENV_FALLBACK_RATE) {
            config.fallback_rate = Decimal::from_str(rate.trim()).map_err(|e| {
                Error::InvalidConfigValue(format!("{}: {}", ENV_FALLBACK_RATE, e))
            })?;
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_secs = secs.trim().parse().map_err(|e| {
                Error::InvalidConfigValue(format!("{}: {}", ENV_REQUEST_TIMEOUT_SECS, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback_rate <= Decimal::ZERO {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be positive, got {}",
                ENV_FALLBACK_RATE, self.fallback_rate
            )));
        }
        if self.base_currency.is_empty() || self.quote_currency.is_empty() {
            return Err(Error::InvalidConfigValue(
                "Currency codes must not be empty".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be at least 1",
                ENV_REQUEST_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The reading the rate cache starts from.
    pub fn fallback_exchange_rate(&self) -> ExchangeRate {
        ExchangeRate::fallback(&self.base_currency, &self.quote_currency, self.fallback_rate)
    }

    pub fn build_provider(&self) -> Arc<dyn RateProvider> {
        match self.rate_provider {
            RateProviderKind::Public => Arc::new(ExchangeRateApiProvider::with_timeout(
                self.rate_endpoint.clone(),
                self.request_timeout(),
            )),
            RateProviderKind::Proxy => Arc::new(ProxyRateProvider::with_timeout(
                self.rate_endpoint.clone(),
                self.request_timeout(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = PricingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PricingConfig::default());
        assert_eq!(config.fallback_rate, dec!(0.14));
        assert_eq!(config.base_currency, "CNY");
        assert_eq!(config.quote_currency, "USD");
        assert_eq!(config.rate_provider, RateProviderKind::Public);
    }

    #[test]
    fn test_overrides() {
        let config = PricingConfig::from_lookup(lookup(&[
            (ENV_RATE_PROVIDER, "Proxy"),
            (ENV_RATE_ENDPOINT, " https://quotes.example.com/api/exchange-rate "),
            (ENV_QUOTE_CURRENCY, "eur"),
            (ENV_FALLBACK_RATE, "0.128"),
            (ENV_REQUEST_TIMEOUT_SECS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.rate_provider, RateProviderKind::Proxy);
        assert_eq!(
            config.rate_endpoint,
            "https://quotes.example.com/api/exchange-rate"
        );
        assert_eq!(config.quote_currency, "EUR");
        assert_eq!(config.fallback_rate, dec!(0.128));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = PricingConfig::from_lookup(lookup(&[(ENV_FALLBACK_RATE, "  ")])).unwrap();
        assert_eq!(config.fallback_rate, dec!(0.14));
    }

    #[test]
    fn test_rejects_bad_values() {
        for pairs in [
            [(ENV_RATE_PROVIDER, "yahoo")],
            [(ENV_FALLBACK_RATE, "abc")],
            [(ENV_FALLBACK_RATE, "0")],
            [(ENV_FALLBACK_RATE, "-0.14")],
            [(ENV_REQUEST_TIMEOUT_SECS, "0")],
            [(ENV_REQUEST_TIMEOUT_SECS, "soon")],
        ] {
            let result = PricingConfig::from_lookup(lookup(&pairs));
            assert!(
                matches!(result, Err(Error::InvalidConfigValue(_))),
                "{:?} should be rejected",
                pairs
            );
        }
    }

    #[test]
    fn test_fallback_exchange_rate() {
        let rate = PricingConfig::default().fallback_exchange_rate();
        assert!(rate.is_fallback());
        assert_eq!(rate.pair_key(), "CNY/USD");
        assert_eq!(rate.rate, dec!(0.14));
    }

    #[test]
    fn test_build_provider_matches_kind() {
        let public = PricingConfig::default().build_provider();
        assert_eq!(public.id(), "EXCHANGE_RATE_API");

        let proxy = PricingConfig {
            rate_provider: RateProviderKind::Proxy,
            ..PricingConfig::default()
        }
        .build_provider();
        assert_eq!(proxy.id(), "RATE_PROXY");
    }
}

//! Exchange-rate provider trait definition.

use async_trait::async_trait;

use crate::errors::RateError;
use crate::models::ExchangeRate;

/// Trait for exchange-rate sources.
///
/// Implement this trait to plug a new conversion endpoint into the rate
/// cache. Providers are stateless apart from their HTTP client; caching,
/// fallback and de-duplication of concurrent fetches are the caller's job.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use pcbquote_rates::{ExchangeRate, RateError, RateProvider};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl RateProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn latest_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate, RateError> {
///         ExchangeRate::new(base, quote, rust_decimal_macros::dec!(0.14), self.id())
///     }
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "EXCHANGE_RATE_API" or "RATE_PROXY".
    /// Stored as the `source` of every rate the provider returns.
    fn id(&self) -> &'static str;

    /// Fetch the latest rate for `1 base = ? quote`.
    ///
    /// # Returns
    ///
    /// A strictly positive rate on success. Non-2xx responses, malformed
    /// payloads and missing or non-positive values are errors.
    async fn latest_rate(&self, base: &str, quote: &str) -> Result<ExchangeRate, RateError>;
}

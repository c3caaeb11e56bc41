//! FX module - the process-wide exchange-rate cache.

mod rate_cache;


pub use pcbquote_rates::{ExchangeRate, RateError, RateProvider};
pub use rate_cache::{RateCache, RateCacheState, RefreshOutcome};

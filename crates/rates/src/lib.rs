//! PCB Quote Rates Crate
//!
//! Fetches the foreign-exchange rate the quote pricing engine uses to render
//! converted figures. The crate only knows how to ask an endpoint for one
//! pair; caching, fallback and de-duplication live in `pcbquote-core`.
//!
//! # Providers
//!
//! - [`ExchangeRateApiProvider`] - public latest-rates endpoint, `{ "rates": { "USD": n } }`
//! - [`ProxyRateProvider`] - internal proxy, `{ "rate": n }`
//!
//! Any non-2xx status, unparseable body, or missing or non-positive rate is a
//! [`RateError`].

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::RateError;
pub use models::ExchangeRate;
pub use provider::exchange_rate_api::ExchangeRateApiProvider;
pub use provider::proxy::ProxyRateProvider;
pub use provider::{RateProvider, REQUEST_TIMEOUT};

//! PCB quote pricing support.
//!
//! Customs fee estimates, a cached exchange rate with single-flight refresh,
//! translation of quote-form fields into backend keys, and a pricing façade
//! that combines them into one display-ready estimate.

pub mod config;
pub mod constants;
pub mod customs;
pub mod errors;
pub mod fx;
pub mod pricing;
pub mod quote_form;

pub use config::{PricingConfig, RateProviderKind};
pub use customs::{compute_customs_fee, CustomsFeeCalculator, CustomsFeeParams, CustomsFeeResult};
pub use fx::RateCache;
pub use pricing::{PriceEstimate, PriceEstimator, QuoteCostInput};
pub use quote_form::{to_backend_payload, translate, translate_value};

// Re-export error types
pub use errors::Error;
pub use errors::Result;

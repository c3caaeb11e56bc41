//! Pricing façade: turns quote costs into a display-ready estimate.

mod pricing_model;
mod pricing_service;

pub use pricing_model::{PriceEstimate, QuoteCostInput};
pub use pricing_service::PriceEstimator;

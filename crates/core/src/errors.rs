//! Core error types for the quote pricing engine.
//!
//! Most of the engine cannot fail: the customs calculator and the field
//! translator are total, and the rate cache absorbs fetch failures. What is
//! left is configuration loading and the optional validation helpers callers
//! run at their own boundary.

use pcbquote_rates::RateError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pricing engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Exchange rate fetch failed: {0}")]
    Rate(#[from] RateError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Validation errors for caller-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Declared value must not be negative, got {0}")]
    NegativeDeclaredValue(Decimal),
}

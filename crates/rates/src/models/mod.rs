//! Exchange-rate models
//!
//! - `exchange_rate` - A single base/quote rate reading (ExchangeRate)

mod exchange_rate;

pub use exchange_rate::ExchangeRate;

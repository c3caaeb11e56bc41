//! Customs module - duty, VAT and agent-fee estimates for cross-border shipments.

mod customs_calculator;
mod customs_model;
mod customs_rates;

pub use customs_calculator::{
    compute_customs_fee, CustomsFeeCalculator, AGENT_FEE, EXPLAIN_COLLECTED_ON_DELIVERY,
    EXPLAIN_INCLUDED_IN_COURIER,
};
pub use customs_model::{CustomsFeeParams, CustomsFeeResult, DeclarationMethod};
pub use customs_rates::{
    CountryRates, CustomsRateTable, DutyVatRates, DEFAULT_DUTY_RATE, DEFAULT_VAT_RATE,
};

use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::customs_model::{CustomsFeeParams, CustomsFeeResult};
use super::customs_rates::CustomsRateTable;

/// Broker fee charged when the courier handles the declaration, in the reporting currency.
pub const AGENT_FEE: Decimal = dec!(20);

pub const EXPLAIN_INCLUDED_IN_COURIER: &str = "Duties, VAT and the customs agent fee are \
prepaid through the courier and included in the shipping charge. Nothing is due on delivery.";

pub const EXPLAIN_COLLECTED_ON_DELIVERY: &str = "Duties and VAT are not included in the \
shipping charge. Customs or the courier will collect them from the recipient on delivery.";

static SHIPPED_CALCULATOR: OnceLock<CustomsFeeCalculator> = OnceLock::new();

/// Computes the customs breakdown with the shipped country table.
pub fn compute_customs_fee(params: &CustomsFeeParams) -> CustomsFeeResult {
    SHIPPED_CALCULATOR
        .get_or_init(CustomsFeeCalculator::default)
        .compute(params)
}

/// Customs fee calculator over a country rate table.
///
/// Pure and deterministic: the same params always produce the same result,
/// and the calculator holds no mutable state, so one instance can be shared
/// freely across threads.
#[derive(Debug, Clone)]
pub struct CustomsFeeCalculator {
    table: CustomsRateTable,
    agent_fee: Decimal,
}

impl Default for CustomsFeeCalculator {
    fn default() -> Self {
        Self::new(CustomsRateTable::default())
    }
}

impl CustomsFeeCalculator {
    pub fn new(table: CustomsRateTable) -> Self {
        Self {
            table,
            agent_fee: AGENT_FEE,
        }
    }

    pub fn with_agent_fee(mut self, agent_fee: Decimal) -> Self {
        self.agent_fee = agent_fee;
        self
    }

    pub fn table(&self) -> &CustomsRateTable {
        &self.table
    }

    /// Computes duty, VAT and agent fee for one shipment.
    ///
    /// A zero declared value yields an all-zero breakdown; there is nothing
    /// for a broker to declare, so no agent fee either. Negative values are
    /// not rejected here and produce negative duty and VAT; callers that
    /// accept raw input run [`CustomsFeeParams::validate`] first.
    ///
    /// Amounts saturate at `Decimal::MAX` instead of overflowing.
    pub fn compute(&self, params: &CustomsFeeParams) -> CustomsFeeResult {
        let rates = self.table.rates_for(&params.country);
        let included_in_courier = params.declaration_method.included_in_courier();

        let duty = params.declared_value.saturating_mul(rates.duty_rate);
        let vat = params.declared_value.saturating_mul(rates.vat_rate);
        let agent_fee = if included_in_courier && !params.declared_value.is_zero() {
            self.agent_fee
        } else {
            Decimal::ZERO
        };

        let explain = if included_in_courier {
            EXPLAIN_INCLUDED_IN_COURIER
        } else {
            EXPLAIN_COLLECTED_ON_DELIVERY
        };

        CustomsFeeResult {
            duty,
            vat,
            agent_fee,
            total: duty.saturating_add(vat).saturating_add(agent_fee),
            included_in_courier,
            explain: explain.to_string(),
        }
    }
}

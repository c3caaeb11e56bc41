use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};

use super::pricing_model::{PriceEstimate, QuoteCostInput};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::customs::{CustomsFeeCalculator, CustomsFeeResult};
use crate::fx::RateCache;

fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

fn round_customs(fees: CustomsFeeResult) -> CustomsFeeResult {
    let duty = round_display(fees.duty);
    let vat = round_display(fees.vat);
    let agent_fee = round_display(fees.agent_fee);
    CustomsFeeResult {
        duty,
        vat,
        agent_fee,
        total: duty.saturating_add(vat).saturating_add(agent_fee),
        ..fees
    }
}

/// Combines the rate cache and the customs calculator into one estimate.
#[derive(Clone)]
pub struct PriceEstimator {
    cache: RateCache,
    calculator: CustomsFeeCalculator,
}

impl PriceEstimator {
    pub fn new(cache: RateCache, calculator: CustomsFeeCalculator) -> Self {
        Self { cache, calculator }
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Prices `input` at the cached rate. Never waits on a rate fetch.
    pub fn estimate(&self, input: &QuoteCostInput) -> PriceEstimate {
        let state = self.cache.state();
        let rate = state.value;

        let board_cost = round_display(rate.convert(input.board_cost));
        let shipping_cost = round_display(rate.convert(input.shipping_cost));
        let customs = round_customs(self.calculator.compute(&input.customs));
        let grand_total = board_cost
            .saturating_add(shipping_cost)
            .saturating_add(customs.total);

        debug!(
            "Estimated {} {} at {} ({})",
            grand_total,
            rate.quote,
            rate.rate,
            rate.source
        );

        PriceEstimate {
            currency: rate.quote.clone(),
            rate_is_fallback: rate.is_fallback(),
            rate_error: state.error,
            exchange_rate: rate,
            board_cost,
            shipping_cost,
            customs,
            grand_total,
        }
    }
}

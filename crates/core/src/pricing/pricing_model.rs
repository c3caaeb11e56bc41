use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::customs::{CustomsFeeParams, CustomsFeeResult};
use crate::errors::ValidationError;
use crate::fx::ExchangeRate;

/// Costs that make up a quote.
///
/// `board_cost` and `shipping_cost` are in the base currency of the rate
/// cache. The customs declared value is already in the quote currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCostInput {
    pub board_cost: Decimal,
    pub shipping_cost: Decimal,
    pub customs: CustomsFeeParams,
}

impl QuoteCostInput {
    pub fn new(board_cost: Decimal, shipping_cost: Decimal, customs: CustomsFeeParams) -> Self {
        Self {
            board_cost,
            shipping_cost,
            customs,
        }
    }

    /// Rejects negative costs and invalid customs parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.board_cost < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Board cost cannot be negative: {}",
                self.board_cost
            )));
        }
        if self.shipping_cost < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Shipping cost cannot be negative: {}",
                self.shipping_cost
            )));
        }
        self.customs.validate()
    }
}

/// A quote priced in the quote currency.
///
/// Money fields are rounded for display. `customs.total` is the sum of its
/// rounded parts so the breakdown always adds up on screen.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub currency: String,
    pub exchange_rate: ExchangeRate,
    pub rate_is_fallback: bool,
    /// Last refresh error, if any. The estimate is still valid.
    pub rate_error: Option<String>,
    pub board_cost: Decimal,
    pub shipping_cost: Decimal,
    pub customs: CustomsFeeResult,
    pub grand_total: Decimal,
}

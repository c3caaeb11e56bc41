//! Country duty/VAT table.
//!
//! Overrides are data, not code: adding a country is one more entry in
//! [`SHIPPED_COUNTRY_RATES`] or a [`CustomsRateTable::with_country`] call.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Duty rate applied to countries without an entry.
pub const DEFAULT_DUTY_RATE: Decimal = dec!(0.10);

/// VAT rate applied to countries without an entry.
pub const DEFAULT_VAT_RATE: Decimal = dec!(0.20);

/// (country code, duty rate, VAT rate)
const SHIPPED_COUNTRY_RATES: &[(&str, Decimal, Decimal)] = &[
    ("US", dec!(0.05), dec!(0)),
    ("DE", dec!(0.08), dec!(0.19)),
];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DutyVatRates {
    pub duty_rate: Decimal,
    pub vat_rate: Decimal,
}

impl Default for DutyVatRates {
    fn default() -> Self {
        Self {
            duty_rate: DEFAULT_DUTY_RATE,
            vat_rate: DEFAULT_VAT_RATE,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CountryRates {
    pub country: String,
    #[serde(flatten)]
    pub rates: DutyVatRates,
}

/// Ordered country → rates table with a default for unmatched countries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomsRateTable {
    default: DutyVatRates,
    entries: Vec<CountryRates>,
}

impl Default for CustomsRateTable {
    fn default() -> Self {
        SHIPPED_COUNTRY_RATES.iter().fold(
            Self::empty(DutyVatRates::default()),
            |table, (country, duty_rate, vat_rate)| {
                table.with_country(*country, *duty_rate, *vat_rate)
            },
        )
    }
}

impl CustomsRateTable {
    /// A table with no overrides.
    pub fn empty(default: DutyVatRates) -> Self {
        Self {
            default,
            entries: Vec::new(),
        }
    }

    /// Adds an override, replacing an existing entry for the same country in place.
    pub fn with_country(
        mut self,
        country: impl Into<String>,
        duty_rate: Decimal,
        vat_rate: Decimal,
    ) -> Self {
        let country = country.into();
        let rates = DutyVatRates {
            duty_rate,
            vat_rate,
        };
        match self.entries.iter_mut().find(|e| e.country == country) {
            Some(entry) => entry.rates = rates,
            None => self.entries.push(CountryRates { country, rates }),
        }
        self
    }

    pub fn with_default(mut self, default: DutyVatRates) -> Self {
        self.default = default;
        self
    }

    /// Exact-match lookup; unmatched countries get the default rates.
    pub fn rates_for(&self, country: &str) -> DutyVatRates {
        self.entries
            .iter()
            .find(|e| e.country == country)
            .map(|e| e.rates)
            .unwrap_or(self.default)
    }

    pub fn default_rates(&self) -> DutyVatRates {
        self.default
    }

    pub fn entries(&self) -> &[CountryRates] {
        &self.entries
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Currency the factory prices boards and shipping in.
pub const DEFAULT_BASE_CURRENCY: &str = "CNY";

/// Currency quotes are displayed and customs are declared in.
pub const DEFAULT_QUOTE_CURRENCY: &str = "USD";

/// Conservative CNY→USD rate used until a fetch succeeds.
pub const DEFAULT_FALLBACK_RATE: Decimal = dec!(0.14);

/// Decimal places for displayed money.
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

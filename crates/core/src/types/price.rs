//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (cedis, not pesewas).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Ghana cedis.
    #[must_use]
    pub const fn cedis(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::GHS)
    }

    /// Format for display (e.g., "GH₵25.00").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    GHS,
}

impl CurrencyCode {
    /// Currency symbol used as a display prefix.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::GHS => "GH₵",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_two_decimals() {
        assert_eq!(Price::cedis(Decimal::new(25, 0)).display(), "GH₵25.00");
        assert_eq!(Price::cedis(Decimal::new(45, 1)).display(), "GH₵4.50");
    }

    #[test]
    fn test_display_rounds_half_up() {
        assert_eq!(Price::cedis(Decimal::new(12345, 3)).display(), "GH₵12.35");
    }

    #[test]
    fn test_display_trait_matches_display() {
        let price = Price::new(Decimal::new(999, 2), CurrencyCode::default());
        assert_eq!(price.to_string(), "GH₵9.99");
    }
}

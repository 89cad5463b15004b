//! Type-safe price representation using decimal arithmetic.
//!
//! All arithmetic stays in [`Decimal`]. Display strings are produced by
//! [`Price::display`] and are never parsed back into amounts.

use core::fmt;
use core::iter::Sum;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
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

    /// A price in the storefront's default currency.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Zero in the default currency.
    #[must_use]
    pub fn zero() -> Self {
        Self::usd(Decimal::ZERO)
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Add another amount in the same currency.
    #[must_use]
    pub fn plus(self, amount: Decimal) -> Self {
        Self::new(self.amount + amount, self.currency_code)
    }

    /// The amount with exactly two decimals and no symbol, e.g. `"25.50"`.
    ///
    /// Midpoints are rounded away from zero.
    #[must_use]
    pub fn amount_string(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }

    /// Format for the page, e.g. `"25.50$"` (symbol as a suffix).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.amount_string(), self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Sums prices of one currency. An empty sequence is [`Price::zero`].
impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(mut iter: I) -> Self {
        let Some(first) = iter.next() else {
            return Self::zero();
        };
        iter.fold(first, |acc, p| {
            debug_assert_eq!(
                acc.currency_code, p.currency_code,
                "summing prices in different currencies"
            );
            Self::new(acc.amount + p.amount, acc.currency_code)
        })
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    RUB,
}

impl CurrencyCode {
    /// Symbol shown after the amount.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::RUB => "₽",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Price::usd(dec("25.5")).display(), "25.50$");
        assert_eq!(Price::usd(dec("100")).display(), "100.00$");
        assert_eq!(Price::zero().display(), "0.00$");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::usd(dec("0.125")).display(), "0.13$");
        assert_eq!(Price::usd(dec("2.004")).display(), "2.00$");
    }

    #[test]
    fn test_amount_string() {
        assert_eq!(Price::usd(dec("115")).amount_string(), "115.00");
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [
            Price::usd(dec("10.00")).times(2),
            Price::usd(dec("5.50")).times(1),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.amount, dec("25.50"));
        assert_eq!(total.display(), "25.50$");
    }

    #[test]
    fn test_plus() {
        let p = Price::usd(dec("100.00")).plus(dec("15.00"));
        assert_eq!(p.display(), "115.00$");
    }

    #[test]
    fn test_sum_keeps_currency() {
        let total: Price = [
            Price::new(dec("3.00"), CurrencyCode::EUR),
            Price::new(dec("4.50"), CurrencyCode::EUR),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Price::new(dec("7.50"), CurrencyCode::EUR));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "summing prices in different currencies")]
    fn test_mixed_currency_sum_panics_in_debug() {
        let _: Price = [
            Price::usd(dec("1.00")),
            Price::new(dec("1.00"), CurrencyCode::EUR),
        ]
        .into_iter()
        .sum();
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = core::iter::empty().sum();
        assert_eq!(total, Price::zero());
    }
}

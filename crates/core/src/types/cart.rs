//! Cart lines, quantities and derived totals.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::{CartLineId, ProductSellerId};
use super::price::Price;

/// Errors that can occur when reading a quantity.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a whole number.
    #[error("quantity must be a whole number, got {0:?}")]
    NotANumber(String),
    /// The input is zero or negative.
    #[error("quantity must be at least 1")]
    NotPositive,
}

/// A positive line quantity.
///
/// A zero quantity is never representable: reaching zero means the line is
/// removed instead (see [`Quantity::apply_delta`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

/// Result of applying a +/- delta to a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line keeps existing with this quantity.
    Set(Quantity),
    /// The line reached zero and must be removed.
    Remove,
}

impl Quantity {
    /// One unit, the amount added by "add to cart".
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// The underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Read a quantity from the text of a quantity input.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotANumber`] for non-numeric input and
    /// [`QuantityError::NotPositive`] for zero or negative values.
    pub fn parse_input(raw: &str) -> Result<Self, QuantityError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| QuantityError::NotANumber(trimmed.to_owned()))?;
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(QuantityError::NotPositive)
    }

    /// Apply an increment/decrement.
    ///
    /// Anything that would reach zero or below becomes
    /// [`QuantityChange::Remove`].
    #[must_use]
    pub fn apply_delta(self, delta: i32) -> QuantityChange {
        let next = i64::from(self.0) + i64::from(delta);
        u32::try_from(next)
            .ok()
            .and_then(Self::new)
            .map_or(QuantityChange::Remove, QuantityChange::Set)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(QuantityError::NotPositive)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One product-seller pairing and its quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Backend primary key of the line.
    pub id: CartLineId,
    /// The seller's listing this line refers to.
    pub product_seller: ProductSellerId,
    /// Units in the cart.
    pub quantity: Quantity,
    /// Price of one unit.
    pub unit_price: Price,
}

impl CartLine {
    /// `quantity × unit_price`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity.get())
    }
}

/// Totals derived from the full set of cart lines.
///
/// Never patched incrementally; always rebuilt with [`Totals::from_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of every line subtotal.
    pub total: Price,
    /// Sum of every line quantity (the cart badge).
    pub item_count: u32,
}

impl Totals {
    /// Totals of an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: Price::zero(),
            item_count: 0,
        }
    }

    /// Recompute totals from scratch.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            total: lines.iter().map(CartLine::subtotal).sum(),
            item_count: lines
                .iter()
                .fold(0_u32, |acc, line| acc.saturating_add(line.quantity.get())),
        }
    }
}

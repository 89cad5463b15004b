//! Checkout form values and delivery pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::contact::{Email, EmailError, Phone, PhoneError};
use super::price::Price;

/// Delivery option chosen on step two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// `delivery_type_1`.
    #[default]
    Standard,
    /// `delivery_type_2`, carries a surcharge.
    Express,
}

impl DeliveryType {
    /// Label shown on the page and copied to the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard delivery",
            Self::Express => "Express delivery",
        }
    }
}

impl std::fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DeliveryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "standard" | "Standard delivery" | "delivery_type_1" => Ok(Self::Standard),
            "express" | "Express delivery" | "delivery_type_2" => Ok(Self::Express),
            other => Err(format!("invalid delivery type: {other}")),
        }
    }
}

/// Payment option chosen on step three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// `type_1`.
    #[default]
    Card,
    /// `type_2`.
    RandomAccount,
}

impl PaymentType {
    /// Label shown on the page and copied to the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Online by card",
            Self::RandomAccount => "Online from a random account",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "card" | "Online by card" | "type_1" => Ok(Self::Card),
            "random_account" | "Online from a random account" | "type_2" => {
                Ok(Self::RandomAccount)
            }
            other => Err(format!("invalid payment type: {other}")),
        }
    }
}

/// Snapshot of the checkout form, read when the summary step is entered.
///
/// Text fields hold exactly what the buyer typed; [`CheckoutDraft::problems`]
/// reports what would not pass validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutDraft {
    /// `fio`.
    pub full_name: String,
    /// `phone`.
    pub phone: String,
    /// `mail`.
    pub email: String,
    /// `delivery_type_1` / `delivery_type_2`.
    pub delivery: DeliveryType,
    /// `city`.
    pub city: String,
    /// `address`.
    pub address: String,
    /// `type_1` / `type_2`.
    pub payment: PaymentType,
}

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftProblem {
    Phone(PhoneError),
    Email(EmailError),
}

impl std::fmt::Display for DraftProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phone(e) => write!(f, "{e}"),
            Self::Email(e) => write!(f, "{e}"),
        }
    }
}

impl CheckoutDraft {
    /// Phone as shown on the summary: masked when valid, raw otherwise.
    #[must_use]
    pub fn display_phone(&self) -> String {
        Phone::parse(&self.phone).map_or_else(|_| self.phone.clone(), |p| p.masked())
    }

    /// Validation problems, in form order.
    #[must_use]
    pub fn problems(&self) -> Vec<DraftProblem> {
        let mut problems = Vec::new();
        if let Err(e) = Phone::parse(&self.phone) {
            problems.push(DraftProblem::Phone(e));
        }
        if let Err(e) = Email::parse(&self.email) {
            problems.push(DraftProblem::Email(e));
        }
        problems
    }
}

/// Order total shown on the summary step.
///
/// Always computed from the snapshot taken at page load, so switching
/// between delivery options never accumulates surcharges.
#[must_use]
pub fn summary_total(original: Price, delivery: DeliveryType, express_surcharge: Decimal) -> Price {
    match delivery {
        DeliveryType::Express => original.plus(express_surcharge),
        DeliveryType::Standard => original,
    }
}

//! Core types for the Bazaar storefront.
//!
//! This module provides type-safe wrappers for the cart and checkout domain.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod id;
pub mod price;
pub mod wizard;

pub use auth::AuthMode;
pub use cart::{CartLine, Quantity, QuantityChange, QuantityError, Totals};
pub use checkout::{CheckoutDraft, DeliveryType, DraftProblem, PaymentType, summary_total};
pub use contact::{Email, EmailError, Phone, PhoneError};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use wizard::{Transition, WizardState, WizardStep};

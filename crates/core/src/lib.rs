//! Bazaar Core - Shared cart and checkout types.
//!
//! This crate provides the types used by the storefront glue and the CLI:
//! - `storefront` - Cart-Add, Cart-Page and Order-Create page logic
//! - `cli` - Command-line driver for the same logic
//!
//! # Architecture
//!
//! The core crate contains only types and pure arithmetic - no I/O, no HTTP
//! clients, no rendering. Everything that touches the backend or the page
//! lives in `bazaar-storefront`.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, quantities, cart lines, contact fields,
//!   checkout options and the checkout wizard state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

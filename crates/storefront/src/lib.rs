//! Bazaar Storefront page logic.
//!
//! The storefront pages talk to the marketplace backend over its REST API
//! and keep three pieces of UI in sync with it:
//!
//! - [`cart_add`] - "add to cart" buttons on product cards
//! - [`cart_page`] - cart totals, line removal and quantity buttons
//! - [`checkout`] - the four-step order wizard and its summary page
//!
//! Every handler receives a [`session::PageSession`] built once at page load.
//! Handlers never touch markup; they update view models in [`view`] and hand
//! them to a [`view::Renderer`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart_add;
pub mod cart_page;
pub mod checkout;
pub mod config;
pub mod dom;
pub mod error;
pub mod session;
pub mod view;

//! HTML fragments for the cart and checkout pages.
//!
//! The templates reproduce the element IDs and classes in [`crate::dom`],
//! so the fragments can replace the matching parts of the storefront pages.

use std::sync::{Mutex, PoisonError};

use askama::Template;

use super::{CartPageView, CheckoutView, Renderer};

/// Cart rows and totals fragment.
#[derive(Template)]
#[template(path = "partials/cart.html")]
struct CartTemplate<'a> {
    view: &'a CartPageView,
}

/// Order wizard fragment.
#[derive(Template)]
#[template(path = "partials/checkout.html")]
struct CheckoutTemplate<'a> {
    view: &'a CheckoutView,
}

/// Render the cart page fragment.
///
/// # Errors
///
/// Returns the template error if rendering fails.
pub fn render_cart_html(view: &CartPageView) -> askama::Result<String> {
    CartTemplate { view }.render()
}

/// Render the order wizard fragment.
///
/// # Errors
///
/// Returns the template error if rendering fails.
pub fn render_checkout_html(view: &CheckoutView) -> askama::Result<String> {
    CheckoutTemplate { view }.render()
}

/// Keeps the latest HTML of each page.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    cart: Mutex<String>,
    checkout: Mutex<String>,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest cart fragment, empty before the first render.
    #[must_use]
    pub fn cart_html(&self) -> String {
        self.cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Latest checkout fragment, empty before the first render.
    #[must_use]
    pub fn checkout_html(&self) -> String {
        self.checkout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Renderer<CartPageView> for HtmlRenderer {
    fn render(&self, view: &CartPageView) {
        match render_cart_html(view) {
            Ok(html) => *self.cart.lock().unwrap_or_else(PoisonError::into_inner) = html,
            Err(e) => tracing::error!(error = %e, "Failed to render cart fragment"),
        }
    }
}

impl Renderer<CheckoutView> for HtmlRenderer {
    fn render(&self, view: &CheckoutView) {
        match render_checkout_html(view) {
            Ok(html) => *self.checkout.lock().unwrap_or_else(PoisonError::into_inner) = html,
            Err(e) => tracing::error!(error = %e, "Failed to render checkout fragment"),
        }
    }
}

//! View models for the storefront pages and the renderers that show them.
//!
//! Page logic builds a complete view model after every change and passes it
//! to a [`Renderer`]. Renderers decide how named regions reach the screen;
//! the logic never addresses markup directly.

mod html;

pub use html::{HtmlRenderer, render_cart_html, render_checkout_html};

use std::sync::{Mutex, PoisonError};

use bazaar_core::{CartLineId, ProductId, WizardStep};
use tracing::info;

use crate::dom;

/// A named part of a page that can carry a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The "add to cart" control of a product card.
    AddToCart(ProductId),
    /// One cart row.
    CartLine(CartLineId),
    /// The cart total.
    CartTotal,
    /// The checkout wizard.
    Checkout,
}

/// A user-facing message shown inline next to a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub region: Region,
    pub message: String,
}

// =============================================================================
// Cart-Add
// =============================================================================

/// State of a product card's "add to cart" control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartView {
    pub product: ProductId,
    /// Line created by the last successful add.
    pub added: Option<CartLineId>,
    pub notice: Option<Notice>,
}

// =============================================================================
// Cart-Page
// =============================================================================

/// One cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub id: CartLineId,
    /// Text of the quantity input, as last confirmed or typed.
    pub quantity_input: String,
    /// Formatted line subtotal, e.g. `"30.00$"`.
    pub subtotal: String,
    /// False once the line has been removed.
    pub visible: bool,
}

impl LineView {
    #[must_use]
    pub fn row_id(&self) -> String {
        dom::cart_row(self.id)
    }

    #[must_use]
    pub fn input_id(&self) -> String {
        dom::quantity_input(self.id)
    }

    #[must_use]
    pub fn price_id(&self) -> String {
        dom::line_price(self.id)
    }

    /// Inline style of the row; removed rows stay in the markup but hidden.
    #[must_use]
    pub const fn display_style(&self) -> &'static str {
        if self.visible { "" } else { "display: none" }
    }
}

/// The whole cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPageView {
    pub lines: Vec<LineView>,
    /// Formatted cart total, e.g. `"25.50$"`.
    pub total: String,
    /// Cart badge count.
    pub item_count: u32,
    pub notice: Option<Notice>,
}

impl CartPageView {
    /// The row for `id`, if the page has one.
    #[must_use]
    pub fn line(&self, id: CartLineId) -> Option<&LineView> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Notice text, empty when there is none.
    #[must_use]
    pub fn notice_message(&self) -> &str {
        self.notice.as_ref().map_or("", |n| n.message.as_str())
    }
}

// =============================================================================
// Order-Create
// =============================================================================

/// One side menu entry of the checkout wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntryView {
    pub step: WizardStep,
    pub path: &'static str,
    pub title: &'static str,
    pub active: bool,
}

impl MenuEntryView {
    #[must_use]
    pub fn class(&self) -> String {
        if self.active {
            format!("{} {}", dom::order::MENU_ITEM, dom::order::MENU_ITEM_ACTIVE)
        } else {
            dom::order::MENU_ITEM.to_string()
        }
    }
}

/// One content page of the checkout wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPageView {
    pub step: WizardStep,
    pub path: &'static str,
    pub open: bool,
    /// `data-path` of this page's "next" button, if it has one.
    pub next_path: Option<&'static str>,
}

impl StepPageView {
    #[must_use]
    pub fn class(&self) -> String {
        if self.open {
            format!("{} {}", dom::order::BLOCK, dom::order::BLOCK_OPEN)
        } else {
            dom::order::BLOCK.to_string()
        }
    }

    /// `data-path` of the "next" button, empty on the last page.
    #[must_use]
    pub fn next_button_path(&self) -> &'static str {
        self.next_path.unwrap_or_default()
    }
}

/// Read-only copy of the form shown on the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryView {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub delivery_type: String,
    pub city: String,
    pub address: String,
    pub payment_type: String,
}

/// Editable form inputs of steps one to three, as last read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub express: bool,
    pub city: String,
    pub address: String,
    pub pay_by_card: bool,
    /// `data-price` of the express delivery option, e.g. `"15.00"`.
    pub express_price: String,
}

/// The whole checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutView {
    pub menu: Vec<MenuEntryView>,
    pub pages: Vec<StepPageView>,
    pub form: FormView,
    pub summary: SummaryView,
    /// Value of the hidden total input, e.g. `"115.00"`.
    pub total_price_value: String,
    /// Visible total, e.g. `"115.00$"`.
    pub cart_price: String,
    pub notice: Option<Notice>,
}

impl CheckoutView {
    /// Steps whose page is open.
    #[must_use]
    pub fn open_steps(&self) -> Vec<WizardStep> {
        self.pages.iter().filter(|p| p.open).map(|p| p.step).collect()
    }

    /// Steps whose menu entry is active.
    #[must_use]
    pub fn active_steps(&self) -> Vec<WizardStep> {
        self.menu.iter().filter(|m| m.active).map(|m| m.step).collect()
    }

    /// Notice text, empty when there is none.
    #[must_use]
    pub fn notice_message(&self) -> &str {
        self.notice.as_ref().map_or("", |n| n.message.as_str())
    }
}

// =============================================================================
// Renderers
// =============================================================================

/// Puts a view model on screen.
pub trait Renderer<V>: Send + Sync {
    fn render(&self, view: &V);
}

impl<V, R: Renderer<V> + ?Sized> Renderer<V> for std::sync::Arc<R> {
    fn render(&self, view: &V) {
        (**self).render(view);
    }
}

/// Both renderers, in order.
impl<V, A: Renderer<V>, B: Renderer<V>> Renderer<V> for (A, B) {
    fn render(&self, view: &V) {
        self.0.render(view);
        self.1.render(view);
    }
}

/// Writes every frame to the log, keyed by element id.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRenderer;

impl Renderer<AddToCartView> for LogRenderer {
    fn render(&self, view: &AddToCartView) {
        match (&view.added, &view.notice) {
            (_, Some(notice)) => info!(product = %view.product, notice = %notice.message, "add to cart"),
            (Some(line), None) => info!(product = %view.product, line = %line, "added to cart"),
            (None, None) => {}
        }
    }
}

impl Renderer<CartPageView> for LogRenderer {
    fn render(&self, view: &CartPageView) {
        for line in view.lines.iter().filter(|l| l.visible) {
            info!(
                row = %line.row_id(),
                quantity = %line.quantity_input,
                subtotal = %line.subtotal,
                "cart line"
            );
        }
        info!(
            element = dom::TOTAL_PRICE,
            total = %view.total,
            items = view.item_count,
            "cart total"
        );
        if let Some(notice) = &view.notice {
            info!(region = ?notice.region, notice = %notice.message, "cart notice");
        }
    }
}

impl Renderer<CheckoutView> for LogRenderer {
    fn render(&self, view: &CheckoutView) {
        let open = view.open_steps();
        info!(open = ?open, element = dom::order::CART_PRICE, price = %view.cart_price, "checkout");
        if open.contains(&WizardStep::SUMMARY) {
            let s = &view.summary;
            info!(
                fio = %s.full_name,
                phone = %s.phone,
                email = %s.email,
                delivery = %s.delivery_type,
                city = %s.city,
                address = %s.address,
                payment = %s.payment_type,
                "checkout summary"
            );
        }
        if let Some(notice) = &view.notice {
            info!(notice = %notice.message, "checkout notice");
        }
    }
}

/// Keeps every rendered frame; handy for asserting on page history.
#[derive(Debug)]
pub struct RecordingRenderer<V> {
    frames: Mutex<Vec<V>>,
}

impl<V> Default for RecordingRenderer<V> {
    fn default() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
        }
    }
}

impl<V: Clone> RecordingRenderer<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames in render order.
    #[must_use]
    pub fn frames(&self) -> Vec<V> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<V> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl<V: Clone + Send> Renderer<V> for RecordingRenderer<V> {
    fn render(&self, view: &V) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(view.clone());
    }
}

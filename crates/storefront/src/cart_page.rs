//! The cart page: rows, quantities and the running total.
//!
//! [`CartPage`] is a cloneable handle, so UI events can run as concurrent
//! tasks. Every mutation waits for the backend to confirm before the page
//! changes, and the total is always recomputed from a fresh line listing.
//!
//! Recomputes are ticketed. A listing that arrives after a newer one has
//! already been applied is dropped, so a slow response can never put an
//! older total back on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bazaar_core::{CartLine, CartLineId, Quantity, QuantityChange, Totals};
use tracing::instrument;

use crate::api::CartBackend;
use crate::error::{AppError, Result};
use crate::session::PageSession;
use crate::view::{CartPageView, LineView, Notice, Region, Renderer};

struct LineState {
    line: CartLine,
    /// Text of the quantity input.
    input: String,
    visible: bool,
}

impl LineState {
    fn new(line: CartLine) -> Self {
        Self {
            input: line.quantity.to_string(),
            line,
            visible: true,
        }
    }

    fn view(&self) -> LineView {
        LineView {
            id: self.line.id,
            quantity_input: self.input.clone(),
            subtotal: self.line.subtotal().display(),
            visible: self.visible,
        }
    }
}

struct PageState {
    lines: Vec<LineState>,
    totals: Totals,
    /// Ticket of the last listing applied to `totals`.
    applied: u64,
    notice: Option<Notice>,
}

impl PageState {
    fn line_mut(&mut self, id: CartLineId) -> Option<&mut LineState> {
        self.lines.iter_mut().find(|l| l.line.id == id)
    }

    fn view(&self) -> CartPageView {
        CartPageView {
            lines: self.lines.iter().map(LineState::view).collect(),
            total: self.totals.total.display(),
            item_count: self.totals.item_count,
            notice: self.notice.clone(),
        }
    }

    /// Apply a listing fetched under `ticket`. Returns false if it is stale.
    fn apply_listing(&mut self, ticket: u64, lines: &[CartLine]) -> bool {
        if ticket <= self.applied {
            return false;
        }
        self.applied = ticket;
        self.totals = Totals::from_lines(lines);
        true
    }
}

/// Handle to the cart page.
pub struct CartPage<B, R> {
    inner: Arc<CartPageInner<B, R>>,
}

struct CartPageInner<B, R> {
    session: PageSession<B>,
    renderer: R,
    state: Mutex<PageState>,
    issued: AtomicU64,
}

impl<B, R> Clone for CartPage<B, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B, R> CartPage<B, R>
where
    B: CartBackend,
    R: Renderer<CartPageView>,
{
    /// Create an empty page. Call [`CartPage::load`] to fill it.
    pub fn new(session: PageSession<B>, renderer: R) -> Self {
        Self {
            inner: Arc::new(CartPageInner {
                session,
                renderer,
                state: Mutex::new(PageState {
                    lines: Vec::new(),
                    totals: Totals::empty(),
                    applied: 0,
                    notice: None,
                }),
                issued: AtomicU64::new(0),
            }),
        }
    }

    /// The renderer this page draws with.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.inner.renderer
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_ticket(&self) -> u64 {
        self.inner.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current page as a view model.
    #[must_use]
    pub fn view(&self) -> CartPageView {
        self.state().view()
    }

    fn render(&self) {
        let view = self.view();
        self.inner.renderer.render(&view);
    }

    /// Show `err` on the page and hand it back.
    fn surface(&self, region: Region, err: AppError) -> AppError {
        tracing::warn!(region = ?region, "Cart page error: {err}");
        self.state().notice = Some(err.notice(region));
        self.render();
        err
    }

    /// Fetch every line and draw the rows and total.
    ///
    /// Rows and total always come from the same listing. If a newer
    /// recompute lands while the listing is in flight, the cart is fetched
    /// again.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing fails.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<CartPageView> {
        let session = &self.inner.session;
        let view = loop {
            let ticket = self.next_ticket();
            let lines = match session.backend().list_lines(session.auth()).await {
                Ok(lines) => lines,
                Err(e) => return Err(self.surface(Region::CartTotal, e.into())),
            };

            let applied = {
                let mut state = self.state();
                if state.apply_listing(ticket, &lines) {
                    state.lines = lines.into_iter().map(LineState::new).collect();
                    state.notice = None;
                    Some(state.view())
                } else {
                    None
                }
            };
            match applied {
                Some(view) => break view,
                None => tracing::debug!(ticket, "Refetching stale cart listing"),
            }
        };
        tracing::info!(lines = view.lines.len(), total = %view.total, "Cart loaded");
        self.inner.renderer.render(&view);
        Ok(view)
    }

    /// Recompute the total from a fresh listing of the cart.
    ///
    /// Returns the totals on screen afterwards, which are not the fetched
    /// ones if a newer recompute finished first.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the listing fails.
    #[instrument(skip(self))]
    pub async fn compute_total(&self) -> Result<Totals> {
        let ticket = self.next_ticket();
        let session = &self.inner.session;
        let lines = match session.backend().list_lines(session.auth()).await {
            Ok(lines) => lines,
            Err(e) => return Err(self.surface(Region::CartTotal, e.into())),
        };

        let (applied, totals) = {
            let mut state = self.state();
            let applied = state.apply_listing(ticket, &lines);
            (applied, state.totals)
        };
        if applied {
            self.render();
        } else {
            tracing::debug!(ticket, "Dropped stale cart total");
        }
        Ok(totals)
    }

    /// Remove a line: delete it on the backend, hide its row, then
    /// recompute the total.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the delete or the recompute fails. A
    /// failed delete leaves the row visible.
    #[instrument(skip(self))]
    pub async fn remove_line(&self, id: CartLineId) -> Result<()> {
        if let Err(e) = self.inner.session.backend().delete_line(id).await {
            return Err(self.surface(Region::CartLine(id), e.into()));
        }

        {
            let mut state = self.state();
            if let Some(line) = state.line_mut(id) {
                line.visible = false;
            }
            state.notice = None;
        }
        tracing::info!(line = %id, "Removed cart line");
        self.render();

        self.compute_total().await?;
        Ok(())
    }

    /// Change a line's quantity by `delta`, starting from the quantity
    /// input's current text.
    ///
    /// Reaching zero or less removes the line. Returns the updated line, or
    /// `None` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the input is not a positive whole
    /// number, `AppError::NotFound` for a line not on the page, or the
    /// backend error.
    #[instrument(skip(self))]
    pub async fn change_quantity(&self, id: CartLineId, delta: i32) -> Result<Option<CartLine>> {
        let current = self
            .state()
            .lines
            .iter()
            .find(|l| l.line.id == id)
            .map(|l| l.input.clone());
        let current = match current {
            Some(raw) => Quantity::parse_input(&raw).map_err(AppError::from),
            None => Err(AppError::NotFound(format!("cart line {id}"))),
        };
        let current = match current {
            Ok(q) => q,
            Err(e) => return Err(self.surface(Region::CartLine(id), e)),
        };

        let quantity = match current.apply_delta(delta) {
            QuantityChange::Remove => {
                self.remove_line(id).await?;
                return Ok(None);
            }
            QuantityChange::Set(quantity) => quantity,
        };

        let session = &self.inner.session;
        let updated = match session
            .backend()
            .update_line(session.auth(), id, quantity)
            .await
        {
            Ok(line) => line,
            Err(e) => return Err(self.surface(Region::CartLine(id), e.into())),
        };

        {
            let mut state = self.state();
            if let Some(line) = state.line_mut(id) {
                line.line.quantity = updated.quantity;
                line.line.unit_price = updated.unit_price;
                line.input = updated.quantity.to_string();
            }
            state.notice = None;
        }
        tracing::info!(line = %id, quantity = %updated.quantity, "Updated cart line");
        self.render();

        self.compute_total().await?;
        Ok(Some(updated))
    }

    /// Record text typed into a line's quantity input.
    ///
    /// The text is only checked when a +/- button uses it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for a line not on the page.
    pub fn edit_quantity_input(&self, id: CartLineId, raw: &str) -> Result<()> {
        let found = {
            let mut state = self.state();
            if let Some(line) = state.line_mut(id) {
                line.input = raw.to_owned();
                true
            } else {
                false
            }
        };
        if !found {
            return Err(self.surface(
                Region::CartLine(id),
                AppError::NotFound(format!("cart line {id}")),
            ));
        }
        self.render();
        Ok(())
    }
}

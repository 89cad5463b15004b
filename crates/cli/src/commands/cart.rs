//! Cart commands.
//!
//! Every command loads the cart first, the way the cart page does on open,
//! then runs one page operation against it.

use std::path::Path;
use std::sync::Arc;

use bazaar_core::{CartLineId, ProductId, SellerId};
use bazaar_storefront::api::HttpCartBackend;
use bazaar_storefront::cart_add::add_to_cart;
use bazaar_storefront::cart_page::CartPage;
use bazaar_storefront::session::PageSession;
use bazaar_storefront::view::{HtmlRenderer, LogRenderer, render_cart_html};
use tracing::info;

use super::CommandError;

type Page = CartPage<HttpCartBackend, (LogRenderer, Arc<HtmlRenderer>)>;

fn session() -> Result<PageSession<HttpCartBackend>, CommandError> {
    Ok(PageSession::from_env()?)
}

async fn open_page() -> Result<Page, CommandError> {
    let page = CartPage::new(session()?, (LogRenderer, Arc::new(HtmlRenderer::new())));
    page.load().await?;
    Ok(page)
}

/// Add one unit of `product`.
///
/// # Errors
///
/// Returns an error if configuration is missing or the backend refuses.
pub async fn add(product: ProductId, seller: Option<SellerId>) -> Result<(), CommandError> {
    let session = session()?;
    let line = add_to_cart(&session, &LogRenderer, product, seller).await?;
    info!(line = %line.id, price = %line.unit_price, "Line created");
    Ok(())
}

/// Show the cart, optionally writing the cart fragment to `html`.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or the file written.
pub async fn show(html: Option<&Path>) -> Result<(), CommandError> {
    let page = open_page().await?;
    if let Some(path) = html {
        let (_, html_renderer) = page.renderer();
        let mut fragment = html_renderer.cart_html();
        if fragment.is_empty() {
            fragment =
                render_cart_html(&page.view()).map_err(|e| CommandError::Render(e.to_string()))?;
        }
        tokio::fs::write(path, fragment).await?;
        info!(path = %path.display(), "Wrote cart fragment");
    }
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or the delete fails.
pub async fn remove(line: CartLineId) -> Result<(), CommandError> {
    let page = open_page().await?;
    page.remove_line(line).await?;
    Ok(())
}

/// Add `delta` units to a line.
///
/// # Errors
///
/// Returns an error if the cart cannot be loaded or the update fails.
pub async fn change(line: CartLineId, delta: i32) -> Result<(), CommandError> {
    let page = open_page().await?;
    match page.change_quantity(line, delta).await? {
        Some(updated) => info!(line = %line, quantity = %updated.quantity, "Quantity changed"),
        None => info!(line = %line, "Line removed"),
    }
    Ok(())
}

//! "Add to cart" on product cards.
//!
//! A product is added through one of its seller listings: the listing is
//! looked up first, then a line with a single unit is created for it.

use bazaar_core::{CartLine, ProductId, Quantity, SellerId};
use tracing::instrument;

use crate::api::CartBackend;
use crate::error::{AppError, Result};
use crate::session::PageSession;
use crate::view::{AddToCartView, Region, Renderer};

/// Add one unit of `product` to the cart.
///
/// With `seller` set, only that seller's listing is considered; otherwise the
/// first listing the backend returns is used.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product has no matching listing, or
/// the backend error if either request fails. The error is also rendered as
/// a notice on the product card.
#[instrument(skip(session, renderer), fields(auth = %session.auth()))]
pub async fn add_to_cart<B: CartBackend>(
    session: &PageSession<B>,
    renderer: &impl Renderer<AddToCartView>,
    product: ProductId,
    seller: Option<SellerId>,
) -> Result<CartLine> {
    match create_line(session, product, seller).await {
        Ok(line) => {
            tracing::info!(line = %line.id, product_seller = %line.product_seller, "Added to cart");
            renderer.render(&AddToCartView {
                product,
                added: Some(line.id),
                notice: None,
            });
            Ok(line)
        }
        Err(e) => {
            tracing::warn!("Failed to add product {product} to cart: {e}");
            renderer.render(&AddToCartView {
                product,
                added: None,
                notice: Some(e.notice(Region::AddToCart(product))),
            });
            Err(e)
        }
    }
}

async fn create_line<B: CartBackend>(
    session: &PageSession<B>,
    product: ProductId,
    seller: Option<SellerId>,
) -> Result<CartLine> {
    let listings = session
        .backend()
        .find_product_sellers(product, seller)
        .await?;
    let product_seller = listings.first().copied().ok_or_else(|| {
        AppError::NotFound(match seller {
            Some(seller) => format!("product {product} from seller {seller}"),
            None => format!("product {product}"),
        })
    })?;

    let line = session
        .backend()
        .create_line(session.auth(), product_seller, Quantity::ONE)
        .await?;
    Ok(line)
}

//! Marketplace backend cart API.
//!
//! # Endpoints
//!
//! - `GET    cart/api/product-seller/?product=<id>&seller=<id>` - seller listings
//! - `POST   cart/api/cart/` - add a line (`{product_seller, count}`)
//! - `GET    cart/api/cart/` - list lines
//! - `PATCH  cart/api/cart/<id>/` - change a line's count
//! - `DELETE cart/api/cart/<id>/` - remove a line
//!
//! Mutating requests carry the `X-CSRFToken` header. The line shape depends
//! on [`AuthMode`]; see [`types`].
//!
//! Page logic is written against the [`CartBackend`] trait; [`HttpCartBackend`]
//! is the real implementation.

mod cache;
mod client;
#[cfg(test)]
pub(crate) mod memory;
pub mod types;

pub use client::HttpCartBackend;

use std::future::Future;

use bazaar_core::{AuthMode, CartLine, CartLineId, ProductId, ProductSellerId, Quantity, SellerId};
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend returned another non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A configured header value is not valid HTTP.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl ApiError {
    /// True for connectivity problems and timeouts.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Operations the storefront pages need from the backend.
pub trait CartBackend: Send + Sync {
    /// Seller listings for a product, optionally restricted to one seller.
    fn find_product_sellers(
        &self,
        product: ProductId,
        seller: Option<SellerId>,
    ) -> impl Future<Output = Result<Vec<ProductSellerId>, ApiError>> + Send;

    /// Create a cart line for a listing.
    fn create_line(
        &self,
        auth: AuthMode,
        product_seller: ProductSellerId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<CartLine, ApiError>> + Send;

    /// Every line in the buyer's cart.
    fn list_lines(
        &self,
        auth: AuthMode,
    ) -> impl Future<Output = Result<Vec<CartLine>, ApiError>> + Send;

    /// Set a line's quantity and return the updated line.
    fn update_line(
        &self,
        auth: AuthMode,
        line: CartLineId,
        quantity: Quantity,
    ) -> impl Future<Output = Result<CartLine, ApiError>> + Send;

    /// Remove a line.
    fn delete_line(&self, line: CartLineId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("cart line 7".to_string());
        assert_eq!(err.to_string(), "Not found: cart line 7");

        let err = ApiError::Status {
            status: 403,
            message: "CSRF Failed".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 403 - CSRF Failed");
        assert!(!err.is_network());
    }
}

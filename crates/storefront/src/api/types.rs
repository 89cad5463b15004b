//! Wire types for the backend cart API.
//!
//! Signed-in buyers get lines with the listing nested:
//!
//! ```json
//! {"id": 3, "product_seller": {"pk": 9, "price": "10.00"}, "count": 2}
//! ```
//!
//! Anonymous (session) carts get the price flattened and the count named
//! `cart_count` in listings, `count` in PATCH responses:
//!
//! ```json
//! {"id": 3, "product_seller": 9, "price": "10.00", "cart_count": 2}
//! ```

use bazaar_core::{AuthMode, CartLine, CartLineId, Price, ProductSellerId, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One seller listing returned by the product-seller lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSellerDto {
    #[serde(alias = "id")]
    pub pk: ProductSellerId,
}

/// Listing nested inside a signed-in buyer's cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct NestedProductSeller {
    #[serde(alias = "id")]
    pub pk: ProductSellerId,
    pub price: Decimal,
}

/// Cart line as returned to signed-in buyers.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedLineDto {
    #[serde(alias = "pk")]
    pub id: CartLineId,
    pub product_seller: NestedProductSeller,
    pub count: Quantity,
}

/// Cart line as returned to anonymous buyers.
#[derive(Debug, Clone, Deserialize)]
pub struct AnonymousLineDto {
    #[serde(alias = "pk")]
    pub id: CartLineId,
    pub product_seller: ProductSellerId,
    pub price: Decimal,
    #[serde(alias = "count")]
    pub cart_count: Quantity,
}

impl From<AuthenticatedLineDto> for CartLine {
    fn from(dto: AuthenticatedLineDto) -> Self {
        Self {
            id: dto.id,
            product_seller: dto.product_seller.pk,
            quantity: dto.count,
            unit_price: Price::usd(dto.product_seller.price),
        }
    }
}

impl From<AnonymousLineDto> for CartLine {
    fn from(dto: AnonymousLineDto) -> Self {
        Self {
            id: dto.id,
            product_seller: dto.product_seller,
            quantity: dto.cart_count,
            unit_price: Price::usd(dto.price),
        }
    }
}

/// Decode one line in the shape the backend uses for `auth`.
///
/// # Errors
///
/// Returns the JSON error if the body does not match that shape.
pub fn decode_line(auth: AuthMode, body: &str) -> Result<CartLine, serde_json::Error> {
    Ok(match auth {
        AuthMode::Authenticated => serde_json::from_str::<AuthenticatedLineDto>(body)?.into(),
        AuthMode::Anonymous => serde_json::from_str::<AnonymousLineDto>(body)?.into(),
    })
}

/// Decode a line listing in the shape the backend uses for `auth`.
///
/// # Errors
///
/// Returns the JSON error if the body does not match that shape.
pub fn decode_lines(auth: AuthMode, body: &str) -> Result<Vec<CartLine>, serde_json::Error> {
    Ok(match auth {
        AuthMode::Authenticated => serde_json::from_str::<Vec<AuthenticatedLineDto>>(body)?
            .into_iter()
            .map(CartLine::from)
            .collect(),
        AuthMode::Anonymous => serde_json::from_str::<Vec<AnonymousLineDto>>(body)?
            .into_iter()
            .map(CartLine::from)
            .collect(),
    })
}

/// Body of `POST cart/api/cart/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLineBody {
    pub product_seller: ProductSellerId,
    pub count: Quantity,
}

/// Body of `PATCH cart/api/cart/<id>/`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateLineBody {
    pub count: Quantity,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_authenticated_lines() {
        let body = r#"[
            {"id": 1, "product_seller": {"pk": 11, "price": "10.00"}, "count": 2},
            {"id": 2, "product_seller": {"pk": 12, "price": 5.5}, "count": 1}
        ]"#;
        let lines = decode_lines(AuthMode::Authenticated, body).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_seller, ProductSellerId::new(11));
        assert_eq!(lines[0].subtotal().display(), "20.00$");
        assert_eq!(lines[1].unit_price.display(), "5.50$");
    }

    #[test]
    fn test_decode_anonymous_listing_and_patch_shapes() {
        let listing = r#"[{"id": 4, "product_seller": 9, "price": "3.00", "cart_count": 3}]"#;
        let lines = decode_lines(AuthMode::Anonymous, listing).unwrap();
        assert_eq!(lines[0].quantity.get(), 3);

        let patched = r#"{"pk": 4, "product_seller": 9, "price": "3.00", "count": 4}"#;
        let line = decode_line(AuthMode::Anonymous, patched).unwrap();
        assert_eq!(line.id, CartLineId::new(4));
        assert_eq!(line.subtotal().display(), "12.00$");
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let anonymous = r#"{"id": 4, "product_seller": 9, "price": "3.00", "cart_count": 4}"#;
        assert!(decode_line(AuthMode::Authenticated, anonymous).is_err());
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let body = r#"{"id": 1, "product_seller": {"pk": 1, "price": "1.00"}, "count": 0}"#;
        assert!(decode_line(AuthMode::Authenticated, body).is_err());
    }

    #[test]
    fn test_request_bodies() {
        let body = CreateLineBody {
            product_seller: ProductSellerId::new(5),
            count: Quantity::ONE,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"product_seller":5,"count":1}"#
        );
        let body = UpdateLineBody {
            count: Quantity::new(3).unwrap(),
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"count":3}"#);
    }
}

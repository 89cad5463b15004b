//! reqwest implementation of [`CartBackend`].

use std::sync::Arc;

use bazaar_core::{AuthMode, CartLine, CartLineId, ProductId, ProductSellerId, Quantity, SellerId};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};
use url::Url;

use super::cache::{PairingCache, PairingKey};
use super::types::{CreateLineBody, ProductSellerDto, UpdateLineBody, decode_line, decode_lines};
use super::{ApiError, CartBackend};
use crate::config::StorefrontConfig;

/// Header the backend checks on every state-changing request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

const PRODUCT_SELLER_PATH: &str = "cart/api/product-seller/";
const CART_PATH: &str = "cart/api/cart/";

/// Client for the backend cart API.
///
/// Cheap to clone; clones share the connection pool and listing cache.
#[derive(Clone)]
pub struct HttpCartBackend {
    inner: Arc<HttpCartBackendInner>,
}

struct HttpCartBackendInner {
    client: reqwest::Client,
    base_url: Url,
    csrf_token: SecretString,
    pairings: PairingCache,
}

impl HttpCartBackend {
    /// Create a client for the configured backend.
    ///
    /// The page's cookies (if configured) are sent with every request so the
    /// backend sees the same session as the browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.cookie {
            let mut value = HeaderValue::from_str(cookie.expose_secret())
                .map_err(|e| ApiError::InvalidHeader(format!("cookie: {e}")))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpCartBackendInner {
                client,
                base_url: config.api_base_url.clone(),
                csrf_token: config.csrf_token.clone(),
                pairings: PairingCache::new(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn line_endpoint(&self, line: CartLineId) -> Result<Url, ApiError> {
        self.endpoint(&format!("{CART_PATH}{line}/"))
    }

    fn csrf(&self) -> &str {
        self.inner.csrf_token.expose_secret()
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let path = response.url().path().to_owned();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }
}

impl CartBackend for HttpCartBackend {
    #[instrument(skip(self), fields(product = %product))]
    async fn find_product_sellers(
        &self,
        product: ProductId,
        seller: Option<SellerId>,
    ) -> Result<Vec<ProductSellerId>, ApiError> {
        let key = PairingKey { product, seller };
        if let Some(listings) = self.inner.pairings.get(&key).await {
            debug!("Cache hit for product listings");
            return Ok(listings);
        }

        let mut url = self.endpoint(PRODUCT_SELLER_PATH)?;
        url.query_pairs_mut()
            .append_pair("product", &product.to_string())
            .append_pair("seller", &seller.map(|s| s.to_string()).unwrap_or_default());

        let body = self.send(self.inner.client.get(url)).await?;
        let listings: Vec<ProductSellerId> = serde_json::from_str::<Vec<ProductSellerDto>>(&body)?
            .into_iter()
            .map(|dto| dto.pk)
            .collect();

        self.inner.pairings.insert(key, listings.clone()).await;
        Ok(listings)
    }

    #[instrument(skip(self), fields(product_seller = %product_seller))]
    async fn create_line(
        &self,
        auth: AuthMode,
        product_seller: ProductSellerId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError> {
        let request = self
            .inner
            .client
            .post(self.endpoint(CART_PATH)?)
            .header(CSRF_HEADER, self.csrf())
            .json(&CreateLineBody {
                product_seller,
                count: quantity,
            });
        let body = self.send(request).await?;
        Ok(decode_line(auth, &body)?)
    }

    #[instrument(skip(self))]
    async fn list_lines(&self, auth: AuthMode) -> Result<Vec<CartLine>, ApiError> {
        let body = self
            .send(self.inner.client.get(self.endpoint(CART_PATH)?))
            .await?;
        Ok(decode_lines(auth, &body)?)
    }

    #[instrument(skip(self), fields(line = %line))]
    async fn update_line(
        &self,
        auth: AuthMode,
        line: CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError> {
        let request = self
            .inner
            .client
            .patch(self.line_endpoint(line)?)
            .header(CSRF_HEADER, self.csrf())
            .json(&UpdateLineBody { count: quantity });
        let body = self.send(request).await?;
        Ok(decode_line(auth, &body)?)
    }

    #[instrument(skip(self), fields(line = %line))]
    async fn delete_line(&self, line: CartLineId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.line_endpoint(line)?)
            .header(CSRF_HEADER, self.csrf());
        self.send(request).await?;
        Ok(())
    }
}

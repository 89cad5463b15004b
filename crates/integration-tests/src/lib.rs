//! End-to-end test support for the Bazaar storefront.
//!
//! [`MockBackend`] serves the marketplace cart API from memory on an
//! ephemeral port, so the real reqwest client and page logic can be run
//! against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = MockBackend::builder()
//!     .listing(9, 1, 3, "10.00")
//!     .spawn()
//!     .await?;
//! let session = backend.session(AuthMode::Authenticated)?;
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use bazaar_core::AuthMode;
use bazaar_storefront::api::HttpCartBackend;
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::error::AppError;
use bazaar_storefront::session::PageSession;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Token the mock expects in `X-CSRFToken`.
pub const CSRF_TOKEN: &str = "test-csrf-token";

/// A seller's listing of a product.
#[derive(Debug, Clone)]
pub struct Listing {
    pub pk: i64,
    pub product: i64,
    pub seller: i64,
    pub price: Decimal,
}

/// A cart line held by the mock.
#[derive(Debug, Clone)]
pub struct MockLine {
    pub id: i64,
    pub product_seller: i64,
    pub count: u32,
}

#[derive(Debug, Default)]
struct MockState {
    auth: AuthMode,
    listings: Vec<Listing>,
    lines: Vec<MockLine>,
    next_id: i64,
    requests: Vec<String>,
    cookies: Vec<String>,
}

impl MockState {
    fn price_of(&self, product_seller: i64) -> Decimal {
        self.listings
            .iter()
            .find(|l| l.pk == product_seller)
            .map_or(Decimal::ZERO, |l| l.price)
    }

    /// A line in the shape the real backend uses for the session's auth.
    fn line_json(&self, line: &MockLine, count_key: &str) -> Value {
        let price = self.price_of(line.product_seller).to_string();
        match self.auth {
            AuthMode::Authenticated => json!({
                "id": line.id,
                "product_seller": {"pk": line.product_seller, "price": price},
                "count": line.count,
            }),
            AuthMode::Anonymous => {
                let mut value = json!({
                    "id": line.id,
                    "product_seller": line.product_seller,
                    "price": price,
                });
                value[count_key] = json!(line.count);
                value
            }
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for [`MockBackend`].
#[derive(Debug, Default)]
pub struct MockBackendBuilder {
    state: MockState,
}

impl MockBackendBuilder {
    /// Signed-in or anonymous line shapes.
    #[must_use]
    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.state.auth = auth;
        self
    }

    /// Add listing `pk` of `product` by `seller`.
    #[must_use]
    pub fn listing(mut self, pk: i64, product: i64, seller: i64, price: &str) -> Self {
        self.state.listings.push(Listing {
            pk,
            product,
            seller,
            price: price.parse().unwrap_or_default(),
        });
        self
    }

    /// Put a line in the cart.
    #[must_use]
    pub fn line(mut self, id: i64, product_seller: i64, count: u32) -> Self {
        self.state.lines.push(MockLine {
            id,
            product_seller,
            count,
        });
        self.state.next_id = self.state.next_id.max(id);
        self
    }

    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn(self) -> std::io::Result<MockBackend> {
        let state: Shared = Arc::new(Mutex::new(self.state));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(MockBackend { addr, state, task })
    }
}

/// In-memory marketplace cart API.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    task: JoinHandle<()>,
}

impl MockBackend {
    #[must_use]
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// Origin the mock listens on, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Configuration a page served by this backend would have.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected.
    pub fn config(&self, auth: AuthMode) -> Result<StorefrontConfig, AppError> {
        let base_url = self.base_url();
        let authenticated = if auth.is_authenticated() { "True" } else { "False" };
        Ok(StorefrontConfig::from_lookup(|key| match key {
            "BAZAAR_API_BASE_URL" => Some(base_url.clone()),
            "BAZAAR_COOKIE" => Some(format!("sessionid=abc123; csrftoken={CSRF_TOKEN}")),
            "BAZAAR_AUTHENTICATED" => Some(authenticated.to_owned()),
            "BAZAAR_REQUEST_TIMEOUT_SECS" => Some("5".to_owned()),
            _ => None,
        })?)
    }

    /// A page session talking to this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn session(&self, auth: AuthMode) -> Result<PageSession<HttpCartBackend>, AppError> {
        PageSession::from_config(&self.config(auth)?)
    }

    /// Lines currently in the cart.
    #[must_use]
    pub fn lines(&self) -> Vec<MockLine> {
        lock(&self.state).lines.clone()
    }

    /// Every request received, as `"<METHOD> <path>"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    /// `Cookie` headers received, in request order.
    #[must_use]
    pub fn cookies(&self) -> Vec<String> {
        lock(&self.state).cookies.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Routes
// =============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/cart/api/product-seller/", get(product_sellers))
        .route("/cart/api/cart/", get(list_lines).post(create_line))
        .route("/cart/api/cart/{id}/", patch(update_line).delete(delete_line))
        .with_state(state)
}

fn record(state: &Shared, headers: &HeaderMap, request: String) {
    let mut state = lock(state);
    state.requests.push(request);
    if let Some(cookie) = headers.get("cookie").and_then(|v| v.to_str().ok()) {
        state.cookies.push(cookie.to_owned());
    }
}

fn csrf_failure(headers: &HeaderMap) -> Option<Response> {
    let token = headers.get("x-csrftoken").and_then(|v| v.to_str().ok());
    (token != Some(CSRF_TOKEN)).then(|| {
        (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "CSRF Failed: CSRF token missing or incorrect."})),
        )
            .into_response()
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
}

#[derive(Debug, Deserialize)]
struct ProductSellerQuery {
    product: i64,
    #[serde(default)]
    seller: String,
}

async fn product_sellers(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ProductSellerQuery>,
) -> Response {
    record(&state, &headers, "GET product-seller".to_owned());
    let seller = query.seller.parse::<i64>().ok();
    let state = lock(&state);
    let listings: Vec<Value> = state
        .listings
        .iter()
        .filter(|l| l.product == query.product && seller.is_none_or(|s| s == l.seller))
        .map(|l| {
            json!({
                "pk": l.pk,
                "product": l.product,
                "seller": l.seller,
                "price": l.price.to_string(),
            })
        })
        .collect();
    Json(listings).into_response()
}

async fn list_lines(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, &headers, "GET cart".to_owned());
    let state = lock(&state);
    let lines: Vec<Value> = state
        .lines
        .iter()
        .map(|line| state.line_json(line, "cart_count"))
        .collect();
    Json(lines).into_response()
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    product_seller: i64,
    count: u32,
}

async fn create_line(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Response {
    record(&state, &headers, "POST cart".to_owned());
    if let Some(rejection) = csrf_failure(&headers) {
        return rejection;
    }
    let mut state = lock(&state);
    if !state.listings.iter().any(|l| l.pk == body.product_seller) {
        return not_found();
    }
    state.next_id += 1;
    let line = MockLine {
        id: state.next_id,
        product_seller: body.product_seller,
        count: body.count,
    };
    let value = state.line_json(&line, "cart_count");
    state.lines.push(line);
    (StatusCode::CREATED, Json(value)).into_response()
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    count: u32,
}

async fn update_line(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<UpdateBody>,
) -> Response {
    record(&state, &headers, format!("PATCH cart/{id}"));
    if let Some(rejection) = csrf_failure(&headers) {
        return rejection;
    }
    let mut state = lock(&state);
    let Some(line) = state.lines.iter_mut().find(|l| l.id == id) else {
        return not_found();
    };
    line.count = body.count;
    let line = line.clone();
    Json(state.line_json(&line, "count")).into_response()
}

async fn delete_line(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    record(&state, &headers, format!("DELETE cart/{id}"));
    if let Some(rejection) = csrf_failure(&headers) {
        return rejection;
    }
    let mut state = lock(&state);
    let before = state.lines.len();
    state.lines.retain(|l| l.id != id);
    if state.lines.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

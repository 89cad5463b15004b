//! Cart page operations against the mock backend over HTTP.

use std::sync::Arc;

use bazaar_core::{AuthMode, CartLineId};
use bazaar_integration_tests::MockBackend;
use bazaar_storefront::api::HttpCartBackend;
use bazaar_storefront::cart_page::CartPage;
use bazaar_storefront::error::AppError;
use bazaar_storefront::view::{CartPageView, HtmlRenderer, RecordingRenderer};

type Page = CartPage<HttpCartBackend, Arc<RecordingRenderer<CartPageView>>>;

async fn two_line_cart(auth: AuthMode) -> (MockBackend, Page) {
    let backend = MockBackend::builder()
        .auth(auth)
        .listing(31, 3, 1, "10.00")
        .listing(41, 4, 1, "5.50")
        .line(1, 31, 2)
        .line(2, 41, 1)
        .spawn()
        .await
        .expect("Failed to start mock backend");
    let session = backend.session(auth).expect("session");
    let page = CartPage::new(session, Arc::new(RecordingRenderer::new()));
    (backend, page)
}

#[tokio::test]
async fn test_total_for_authenticated_cart() {
    let (_backend, page) = two_line_cart(AuthMode::Authenticated).await;

    let view = page.load().await.expect("load");

    assert_eq!(view.total, "25.50$");
    assert_eq!(view.item_count, 3);
}

#[tokio::test]
async fn test_total_for_anonymous_cart() {
    let (_backend, page) = two_line_cart(AuthMode::Anonymous).await;

    page.load().await.expect("load");
    let totals = page.compute_total().await.expect("total");

    assert_eq!(totals.total.display(), "25.50$");
}

#[tokio::test]
async fn test_increment_then_recompute() {
    for auth in [AuthMode::Authenticated, AuthMode::Anonymous] {
        let (backend, page) = two_line_cart(auth).await;
        page.load().await.expect("load");

        page.change_quantity(CartLineId::new(1), 1)
            .await
            .expect("increment");

        let view = page.view();
        assert_eq!(view.line(CartLineId::new(1)).expect("row").subtotal, "30.00$");
        assert_eq!(view.total, "35.50$");
        assert_eq!(
            backend.requests(),
            vec!["GET cart", "PATCH cart/1", "GET cart"]
        );
    }
}

#[tokio::test]
async fn test_remove_is_sequenced() {
    let (backend, page) = two_line_cart(AuthMode::Authenticated).await;
    page.load().await.expect("load");

    page.remove_line(CartLineId::new(2)).await.expect("remove");

    assert_eq!(
        backend.requests(),
        vec!["GET cart", "DELETE cart/2", "GET cart"]
    );
    assert_eq!(backend.lines().len(), 1);
    let view = page.view();
    assert!(!view.line(CartLineId::new(2)).expect("row").visible);
    assert_eq!(view.total, "20.00$");
}

#[tokio::test]
async fn test_decrement_to_zero_matches_remove() {
    let (backend, page) = two_line_cart(AuthMode::Authenticated).await;
    page.load().await.expect("load");

    let result = page
        .change_quantity(CartLineId::new(1), -2)
        .await
        .expect("decrement");

    assert!(result.is_none());
    assert_eq!(
        backend.requests(),
        vec!["GET cart", "DELETE cart/1", "GET cart"]
    );
    assert_eq!(page.view().total, "5.50$");
}

#[tokio::test]
async fn test_deleting_missing_line_surfaces_not_found() {
    let (_backend, page) = two_line_cart(AuthMode::Authenticated).await;
    page.load().await.expect("load");

    let err = page
        .remove_line(CartLineId::new(99))
        .await
        .expect_err("missing line");

    assert!(matches!(err, AppError::NotFound(_)));
    assert!(page.view().notice.is_some());
    assert_eq!(page.view().total, "25.50$");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let backend = MockBackend::builder()
        .spawn()
        .await
        .expect("Failed to start mock backend");
    let config = backend.config(AuthMode::Anonymous).expect("config");
    drop(backend);
    tokio::task::yield_now().await;

    let session = bazaar_storefront::session::PageSession::from_config(&config).expect("session");
    let page = CartPage::new(session, Arc::new(RecordingRenderer::<CartPageView>::new()));

    let err = page.load().await.expect_err("backend is gone");

    assert!(matches!(err, AppError::Network(_)));
    assert!(page.view().notice.is_some());
}

#[tokio::test]
async fn test_html_renderer_tracks_page() {
    let backend = MockBackend::builder()
        .listing(31, 3, 1, "10.00")
        .line(1, 31, 2)
        .spawn()
        .await
        .expect("Failed to start mock backend");
    let session = backend.session(AuthMode::Anonymous).expect("session");
    let renderer = Arc::new(HtmlRenderer::new());
    let page = CartPage::new(session, Arc::clone(&renderer));

    page.load().await.expect("load");
    page.change_quantity(CartLineId::new(1), 1)
        .await
        .expect("increment");

    let html = renderer.cart_html();
    assert!(html.contains("id=\"product_price_1\">30.00$<"));
    assert!(html.contains("id=\"total_price\">30.00$<"));
}

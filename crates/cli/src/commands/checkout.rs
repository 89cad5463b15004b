//! Checkout command.
//!
//! Reads the form from a YAML file, for example:
//!
//! ```yaml
//! full_name: Ivan Petrov
//! phone: "+7 (999) 123-45-67"
//! email: ivan@example.com
//! delivery: express
//! city: Moscow
//! address: Tverskaya 1
//! payment: card
//! ```

use std::path::Path;
use std::sync::Arc;

use bazaar_core::{CheckoutDraft, Price};
use bazaar_storefront::checkout::{CheckoutForm, CheckoutPage};
use bazaar_storefront::view::{HtmlRenderer, LogRenderer};
use rust_decimal::Decimal;
use tracing::info;

use super::CommandError;

/// Walk the wizard from the first step to the confirmation step.
///
/// # Errors
///
/// Returns an error if the form file cannot be read or parsed, or the HTML
/// cannot be written.
pub async fn run(
    draft: &Path,
    total: Decimal,
    express_price: Decimal,
    html: Option<&Path>,
) -> Result<(), CommandError> {
    let content = tokio::fs::read_to_string(draft).await?;
    let draft: CheckoutDraft = serde_yaml::from_str(&content)?;
    let form = CheckoutForm {
        draft,
        express_surcharge: express_price,
    };

    let html_renderer = Arc::new(HtmlRenderer::new());
    let mut page = CheckoutPage::new(Price::usd(total), (LogRenderer, Arc::clone(&html_renderer)));
    while page.advance(&form).is_some() {}

    info!(step = %page.active(), price = %page.price().display(), "Checkout ready");

    if let Some(path) = html {
        tokio::fs::write(path, html_renderer.checkout_html()).await?;
        info!(path = %path.display(), "Wrote checkout fragment");
    }
    Ok(())
}

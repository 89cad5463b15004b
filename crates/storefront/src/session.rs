//! Per-page session shared by the page controllers.

use std::sync::Arc;

use bazaar_core::AuthMode;

use crate::api::{CartBackend, HttpCartBackend};
use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Backend handle plus the buyer's authentication state.
///
/// This struct is cheaply cloneable via `Arc`.
pub struct PageSession<B> {
    inner: Arc<PageSessionInner<B>>,
}

struct PageSessionInner<B> {
    backend: B,
    auth: AuthMode,
}

impl<B> Clone for PageSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: CartBackend> PageSession<B> {
    /// Create a session over `backend` for a page rendered with `auth`.
    #[must_use]
    pub fn new(backend: B, auth: AuthMode) -> Self {
        Self {
            inner: Arc::new(PageSessionInner { backend, auth }),
        }
    }

    /// Get a reference to the cart backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Authentication state the page was rendered with.
    #[must_use]
    pub fn auth(&self) -> AuthMode {
        self.inner.auth
    }
}

impl PageSession<HttpCartBackend> {
    /// Build a session talking to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built from `config`.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, AppError> {
        let backend = HttpCartBackend::new(config)?;
        Ok(Self::new(backend, config.auth))
    }

    /// Build a session from `BAZAAR_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the configuration is missing or
    /// malformed, or an error if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, AppError> {
        let config = StorefrontConfig::from_env()?;
        tracing::debug!(?config, "Loaded configuration");
        Self::from_config(&config)
    }
}

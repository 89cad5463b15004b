//! Unified error handling for page handlers.
//!
//! Every handler returns `Result<T, AppError>`. Before returning an error the
//! handler also shows it on the page as a [`Notice`], so failures never
//! leave the buyer looking at stale state without explanation.

use bazaar_core::{EmailError, PhoneError, QuantityError};
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::view::{Notice, Region};

/// Application-level error type for the storefront pages.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend unreachable or too slow.
    #[error("Network error: {0}")]
    Network(String),

    /// Nothing matched (no seller listing, unknown cart line).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input from the page did not validate.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend rejected the request or answered with something unreadable.
    #[error("Backend error: {0}")]
    Backend(ApiError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            err if err.is_network() => Self::Network(err.to_string()),
            ApiError::NotFound(what) => Self::NotFound(what),
            other => Self::Backend(other),
        }
    }
}

impl From<QuantityError> for AppError {
    fn from(err: QuantityError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PhoneError> for AppError {
    fn from(err: PhoneError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl AppError {
    /// Message safe to show the buyer.
    ///
    /// Backend and configuration details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the store. Check your connection and try again.".to_string()
            }
            Self::NotFound(_) => "This item is no longer available.".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::Backend(_) | Self::Config(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// The notice to show for this error in `region`.
    #[must_use]
    pub fn notice(&self, region: Region) -> Notice {
        Notice {
            region,
            message: self.user_message(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

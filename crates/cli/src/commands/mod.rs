//! Subcommand implementations.

pub mod cart;
pub mod checkout;

use bazaar_storefront::error::AppError;
use thiserror::Error;

/// Errors a subcommand can end with.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Page operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The checkout form file is not valid YAML.
    #[error("Invalid form file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Rendering HTML failed.
    #[error("Render error: {0}")]
    Render(String),
}

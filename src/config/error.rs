//! Configuration errors.

use thiserror::Error;

/// Raised by [`AppConfig::load`](super::AppConfig::load).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed into its field.
    #[error("could not load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// A loaded configuration that cannot be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("port must be non-zero")]
    InvalidPort,

    #[error("cannot bind to {0}")]
    InvalidAddress(String),

    #[error("production requires an explicit JWT secret")]
    DefaultSecretInProduction,
}

//! Error types for citylens.

use thiserror::Error;

/// Result type alias using citylens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for citylens operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Store query or insert failed (wraps sqlx::Error)
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// External provider returned nothing usable, a non-2xx status, or a
    /// malformed body
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing or invalid configuration (credential, connection string)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error came from an external provider.
    pub fn is_provider(&self) -> bool {
        matches!(self, Error::Provider(_))
    }

    /// Whether this error came from the store.
    pub fn is_store(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

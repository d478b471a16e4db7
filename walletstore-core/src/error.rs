//! Error types for the credential store and its underlying key-value stores.

use thiserror::Error;

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while persisting or reading the wallet credential.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The credential could not be converted to or from its stored form.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value is not valid UTF-8.
    #[error("value stored under '{key}' is not valid UTF-8: {source}")]
    InvalidEncoding {
        /// Key whose value could not be decoded.
        key: String,
        /// The decoding error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// A file-backed store failed an I/O operation.
    #[error("I/O error during {context}: {source}")]
    Io {
        /// Context describing the operation.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other underlying store rejected the call.
    #[error("underlying store error: {0}")]
    Backend(String),

    /// The key cannot be held by the underlying store.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The credential handed to `save` is unusable.
    #[error("invalid credential: {0}")]
    InvalidCredential(&'static str),
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Converting to or from the stored string failed.
    Serialization,
    /// The underlying key-value store rejected a get, set or remove.
    UnderlyingStore,
    /// The caller passed a credential that cannot be stored.
    InvalidInput,
}

impl StoreError {
    /// Creates an I/O error with context.
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a backend error.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend(message.into())
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Serialization(_) | Self::InvalidEncoding { .. } => {
                FailureKind::Serialization
            }
            Self::Io { .. } | Self::Backend(_) | Self::InvalidKey { .. } => {
                FailureKind::UnderlyingStore
            }
            Self::InvalidCredential(_) => FailureKind::InvalidInput,
        }
    }
}

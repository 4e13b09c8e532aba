//! Error types for the store layer.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write collided with an existing document on a unique field.
    ///
    /// Carries the offending field name and value so callers can
    /// report which constraint was violated.
    #[error("duplicate key in '{collection}': {field} = {value:?}")]
    DuplicateKey {
        /// Collection where the collision occurred.
        collection: String,
        /// Name of the unique field.
        field: &'static str,
        /// The colliding value.
        value: String,
    },

    /// A document failed to encode or decode.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the failure.
        message: String,
    },

    /// The backend rejected or failed an operation.
    #[error("backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },

    /// Stored data is inconsistent with what the store expects.
    #[error("corrupt store: {message}")]
    Corrupt {
        /// Description of the inconsistency.
        message: String,
    },
}

impl StoreError {
    /// Creates a duplicate key error.
    pub fn duplicate_key(
        collection: impl Into<String>,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            field,
            value: value.into(),
        }
    }

    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a corruption error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Returns true if this is a duplicate key error.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }
}

//! Error types and store-error translation.

use cavadb_store::{DocumentId, StoreError};
use std::fmt;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The kind of resource a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A bottle document.
    Bottle,
    /// A region document.
    Region,
    /// A review document.
    Review,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bottle => "bottle",
            Self::Region => "region",
            Self::Review => "review",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the catalog.
///
/// This is the closed set consumed by transport collaborators;
/// everything the store can fail with is translated into one of
/// these three kinds.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The resource does not exist at lookup time. Recoverable.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of resource was looked up.
        kind: ResourceKind,
        /// The id that resolved to nothing.
        id: DocumentId,
    },

    /// A uniqueness constraint was violated on write. Recoverable,
    /// the caller may retry with different input.
    #[error("conflict on '{field}': {value:?} already exists")]
    Conflict {
        /// The unique field that collided.
        field: String,
        /// The colliding value.
        value: String,
    },

    /// The store failed in a way the catalog cannot interpret.
    /// Fatal to the current operation; never retried by the core.
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl CatalogError {
    /// Creates a not-found error.
    pub fn not_found(kind: ResourceKind, id: DocumentId) -> Self {
        Self::NotFound { kind, id }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field, value, .. } => Self::Conflict {
                field: field.to_string(),
                value,
            },
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_translates_to_conflict() {
        let store_err = StoreError::duplicate_key("bottles", "name", "Margaux");
        let err = CatalogError::from(store_err);

        assert!(err.is_conflict());
        match err {
            CatalogError::Conflict { field, value } => {
                assert_eq!(field, "name");
                assert_eq!(value, "Margaux");
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_store_errors_stay_opaque() {
        let err = CatalogError::from(StoreError::backend("connection reset"));
        assert!(matches!(err, CatalogError::Storage(_)));
        assert!(!err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_names_kind_and_id() {
        let id = DocumentId::new();
        let err = CatalogError::not_found(ResourceKind::Bottle, id);
        let msg = err.to_string();
        assert!(msg.contains("bottle"));
        assert!(msg.contains(&id.to_string()));
    }
}

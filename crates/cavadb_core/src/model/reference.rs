//! Lazy document reference.

use cavadb_store::{Document, DocumentId};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A lazy, non-owning reference to another document.
///
/// Only the identifier is stored; resolving the full document is a
/// separate fetch (or supplied by the eager-join read path). The two
/// states are explicit, so callers can never observe an ambiguous
/// half-loaded value.
#[derive(Debug, Clone, PartialEq)]
pub enum Ref<T> {
    /// Only the identifier is known.
    Unresolved(DocumentId),
    /// The full document has been fetched.
    Resolved(T),
}

impl<T: Document> Ref<T> {
    /// Returns the referenced document's id.
    ///
    /// `None` only for a resolved document that was never saved,
    /// which a catalog never produces.
    #[must_use]
    pub fn id(&self) -> Option<DocumentId> {
        match self {
            Self::Unresolved(id) => Some(*id),
            Self::Resolved(doc) => doc.doc_id(),
        }
    }

    /// Returns the resolved document, if this reference is resolved.
    #[must_use]
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Unresolved(_) => None,
            Self::Resolved(doc) => Some(doc),
        }
    }

    /// Returns true if the full document is loaded.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

// On the wire a reference is always the bare id: resolution state is
// an in-memory affair and resolved data is never persisted twice.
impl<T: Document> Serialize for Ref<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.id() {
            Some(id) => id.serialize(serializer),
            None => Err(serde::ser::Error::custom(
                "cannot serialize a reference to an unsaved document",
            )),
        }
    }
}

impl<'de, T: Document> Deserialize<'de> for Ref<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::Unresolved(DocumentId::deserialize(deserializer)?))
    }
}

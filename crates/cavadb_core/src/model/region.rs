//! Region document.

use cavadb_store::{Document, DocumentId};
use serde::{Deserialize, Serialize};

/// A wine-producing region.
///
/// `name` is globally unique, enforced by the store. Regions are
/// owned independently: bottles hold a non-owning reference by id, a
/// region may exist with zero referencing bottles, and no delete path
/// exists (renaming in place is the only mutation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Store-generated identifier.
    #[serde(default)]
    pub id: Option<DocumentId>,
    /// Unique region name.
    pub name: String,
}

impl Region {
    /// Creates an unsaved region.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Document for Region {
    fn doc_id(&self) -> Option<DocumentId> {
        self.id
    }

    fn assign_id(&mut self, id: DocumentId) {
        self.id = Some(id);
    }

    fn unique_field() -> Option<&'static str> {
        Some("name")
    }

    fn unique_value(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

//! Review document.

use cavadb_store::{Document, DocumentId};
use serde::{Deserialize, Serialize};

/// A tasting review attached to a bottle.
///
/// `bottle_ref` is the mandatory back-reference naming the parent
/// bottle, and it is the authoritative side of the relationship: a
/// review cannot exist without it, and cascade deletion finds reviews
/// by scanning for it rather than trusting the bottle's cached forward
/// list. Reviews are created only through [`crate::Catalog::add_review`]
/// and destroyed by the cascade delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Store-generated identifier.
    #[serde(default)]
    pub id: Option<DocumentId>,
    /// Free-form comment text.
    pub comment_text: String,
    /// Back-reference to the parent bottle.
    pub bottle_ref: DocumentId,
}

impl Review {
    /// Creates an unsaved review for a bottle.
    pub fn new(comment_text: impl Into<String>, bottle_ref: DocumentId) -> Self {
        Self {
            id: None,
            comment_text: comment_text.into(),
            bottle_ref,
        }
    }
}

impl Document for Review {
    fn doc_id(&self) -> Option<DocumentId> {
        self.id
    }

    fn assign_id(&mut self, id: DocumentId) {
        self.id = Some(id);
    }
}

//! Bottle document and its summary projection.

use crate::model::{Ref, Region};
use cavadb_store::{Document, DocumentId};
use serde::{Deserialize, Serialize};

/// A bottle's color, stored as an embedded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Display label, e.g. "Rouge".
    pub label: String,
}

impl Color {
    /// Creates a color from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// A bottle in the cellar.
///
/// `name` is globally unique, enforced by the store. `region_ref` is
/// lazy: only the region's id is persisted, and resolving the full
/// region is either a separate fetch or the eager-join listing.
///
/// `review_refs` is a denormalized forward-pointer list maintained by
/// the catalog; it is not the source of truth for review existence
/// (the review's back-reference is). After every successful catalog
/// operation, each id here points at a live review whose back-
/// reference names this bottle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottle {
    /// Store-generated identifier.
    #[serde(default)]
    pub id: Option<DocumentId>,
    /// Unique bottle name.
    pub name: String,
    /// Vintage year.
    pub vintage_year: i32,
    /// Lazy reference to the producing region, if known.
    #[serde(default)]
    pub region_ref: Option<Ref<Region>>,
    /// Embedded color value, if known.
    #[serde(default)]
    pub color: Option<Color>,
    /// Cached forward pointers to this bottle's reviews.
    #[serde(default)]
    pub review_refs: Vec<DocumentId>,
}

impl Bottle {
    /// Creates an unsaved bottle.
    pub fn new(name: impl Into<String>, vintage_year: i32) -> Self {
        Self {
            id: None,
            name: name.into(),
            vintage_year,
            region_ref: None,
            color: None,
            review_refs: Vec::new(),
        }
    }

    /// Sets the region reference by id.
    #[must_use]
    pub fn with_region(mut self, region_id: DocumentId) -> Self {
        self.region_ref = Some(Ref::Unresolved(region_id));
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl Document for Bottle {
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

/// Partial-field projection of a bottle for cheap listings.
///
/// Decoded straight from the stored bytes; the region reference and
/// review pointers are never populated here, whatever the underlying
/// record holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleSummary {
    /// Bottle name.
    pub name: String,
    /// Vintage year.
    pub vintage_year: i32,
    /// Embedded color value, if known.
    #[serde(default)]
    pub color: Option<Color>,
}

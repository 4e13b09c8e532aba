//! Unique single-field index.

use crate::error::{StoreError, StoreResult};
use crate::id::DocumentId;
use std::collections::HashMap;

/// An in-memory value-to-id map enforcing uniqueness of one field.
///
/// The index is rebuilt from a full scan when its collection is
/// opened, and kept in sync on every save and delete thereafter.
/// A colliding insert fails with [`StoreError::DuplicateKey`]
/// carrying the field name and offending value.
#[derive(Debug)]
pub struct UniqueIndex {
    /// Collection this index belongs to.
    collection: String,
    /// Name of the indexed field.
    field: &'static str,
    /// Value -> document id.
    entries: HashMap<String, DocumentId>,
}

impl UniqueIndex {
    /// Creates an empty index for a collection's field.
    pub fn new(collection: impl Into<String>, field: &'static str) -> Self {
        Self {
            collection: collection.into(),
            field,
            entries: HashMap::new(),
        }
    }

    /// Returns the indexed field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Inserts a value-id mapping.
    ///
    /// Re-inserting the same mapping is a no-op; mapping an already
    /// taken value to a different document is a duplicate key.
    pub fn insert(&mut self, value: &str, id: DocumentId) -> StoreResult<()> {
        if let Some(existing) = self.entries.get(value) {
            if *existing != id {
                return Err(StoreError::duplicate_key(
                    self.collection.clone(),
                    self.field,
                    value,
                ));
            }
            return Ok(());
        }
        self.entries.insert(value.to_string(), id);
        Ok(())
    }

    /// Moves a document's mapping from `previous` to `value`.
    ///
    /// Used when a re-save changes the indexed field. The new value is
    /// claimed before the old one is released, so a failed update
    /// leaves the index untouched.
    pub fn update(
        &mut self,
        previous: Option<&str>,
        value: &str,
        id: DocumentId,
    ) -> StoreResult<()> {
        if previous == Some(value) {
            return Ok(());
        }
        self.insert(value, id)?;
        if let Some(prev) = previous {
            self.remove(prev, id);
        }
        Ok(())
    }

    /// Removes a value-id mapping. Returns whether it was present.
    ///
    /// Only removes the entry if it maps to `id`, so a stale caller
    /// cannot evict another document's claim.
    pub fn remove(&mut self, value: &str, id: DocumentId) -> bool {
        match self.entries.get(value) {
            Some(existing) if *existing == id => {
                self.entries.remove(value);
                true
            }
            _ => false,
        }
    }

    /// Looks up the document holding a value.
    #[must_use]
    pub fn lookup(&self, value: &str) -> Option<DocumentId> {
        self.entries.get(value).copied()
    }

    /// Returns the number of indexed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuilds the index from scratch.
    ///
    /// A collision during rebuild means the stored data itself
    /// violates the constraint, which is reported as corruption.
    pub fn rebuild<I>(&mut self, entries: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = (String, DocumentId)>,
    {
        self.entries.clear();
        for (value, id) in entries {
            self.insert(&value, id).map_err(|_| {
                StoreError::corrupt(format!(
                    "collection '{}' holds duplicate {} = {:?}",
                    self.collection, self.field, value
                ))
            })?;
        }
        Ok(())
    }
}

//! Typed collection of documents.

use crate::backend::DocumentBackend;
use crate::document::{from_cbor, to_cbor, Document};
use crate::error::{StoreError, StoreResult};
use crate::id::DocumentId;
use crate::index::UniqueIndex;
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed collection of documents.
///
/// `Collection<T>` provides type-safe access to documents of type `T`,
/// encoding and decoding CBOR automatically. Handles are cheap to
/// clone and share the backend and unique index with every other
/// handle for the same collection.
///
/// There is no query language. Filtering is done with host-language
/// predicates, and every predicate method performs a full scan.
pub struct Collection<T: Document> {
    /// Collection name.
    name: String,
    /// Shared raw storage.
    backend: Arc<dyn DocumentBackend>,
    /// Unique index, present when `T` declares a unique field.
    unique: Option<Arc<Mutex<UniqueIndex>>>,
    /// Type marker.
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            backend: Arc::clone(&self.backend),
            unique: self.unique.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    /// Creates a collection handle. Called by [`crate::DocumentStore`].
    pub(crate) fn new(
        name: impl Into<String>,
        backend: Arc<dyn DocumentBackend>,
        unique: Option<Arc<Mutex<UniqueIndex>>>,
    ) -> Self {
        Self {
            name: name.into(),
            backend,
            unique,
            _marker: PhantomData,
        }
    }

    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Saves a document, assigning an id on first save.
    ///
    /// Returns the document with its id set. If the document's unique
    /// field collides with another document, fails with
    /// [`StoreError::DuplicateKey`] and writes nothing.
    pub fn save(&self, mut record: T) -> StoreResult<T> {
        let id = match record.doc_id() {
            Some(id) => id,
            None => {
                let id = DocumentId::new();
                record.assign_id(id);
                id
            }
        };
        let payload = to_cbor(&record)?;

        match &self.unique {
            Some(index) => {
                let value = record.unique_value().ok_or_else(|| {
                    StoreError::corrupt(format!(
                        "document in '{}' is missing its unique field value",
                        self.name
                    ))
                })?;

                // Hold the index lock across the backend write so two
                // saves racing on the same value cannot both pass the
                // uniqueness check.
                let mut index = index.lock();
                let previous = match self.backend.get(&self.name, id)? {
                    Some(bytes) => from_cbor::<T>(&bytes)?.unique_value(),
                    None => None,
                };
                index.update(previous.as_deref(), &value, id)?;

                if let Err(e) = self.backend.put(&self.name, id, payload) {
                    // The write never landed; undo the index claim.
                    match previous.as_deref() {
                        Some(prev) => {
                            let _ = index.update(Some(&value), prev, id);
                        }
                        None => {
                            index.remove(&value, id);
                        }
                    }
                    return Err(e);
                }
            }
            None => self.backend.put(&self.name, id, payload)?,
        }

        Ok(record)
    }

    /// Gets a document by id.
    ///
    /// Returns `None` if the document doesn't exist.
    pub fn get(&self, id: DocumentId) -> StoreResult<Option<T>> {
        match self.backend.get(&self.name, id)? {
            Some(bytes) => Ok(Some(from_cbor(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Deletes a document by id. Returns whether it existed.
    pub fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        let Some(bytes) = self.backend.get(&self.name, id)? else {
            return Ok(false);
        };
        // Decode before removing so a codec failure leaves the
        // document and its index entry in place together.
        let value = match &self.unique {
            Some(_) => from_cbor::<T>(&bytes)?.unique_value(),
            None => None,
        };

        let removed = self.backend.remove(&self.name, id)?;
        if removed {
            if let (Some(index), Some(value)) = (&self.unique, value) {
                index.lock().remove(&value, id);
            }
        }
        Ok(removed)
    }

    /// Returns every document in the collection. Full scan.
    pub fn find_all(&self) -> StoreResult<Vec<T>> {
        let raw = self.backend.scan(&self.name)?;
        let mut result = Vec::with_capacity(raw.len());
        for (_, bytes) in raw {
            result.push(from_cbor(&bytes)?);
        }
        Ok(result)
    }

    /// Returns every document matching a predicate. Full scan.
    pub fn find_where(&self, pred: impl Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        let mut result = self.find_all()?;
        result.retain(|doc| pred(doc));
        Ok(result)
    }

    /// Deletes every document matching a predicate.
    ///
    /// Returns the removed documents: their count is the number of
    /// deletions, and the documents themselves are what a compensating
    /// action needs to restore them. Each removal is individually
    /// atomic; a mid-scan failure leaves earlier removals committed.
    pub fn delete_where(&self, pred: impl Fn(&T) -> bool) -> StoreResult<Vec<T>> {
        let matches = self.find_where(pred)?;
        let mut removed = Vec::with_capacity(matches.len());

        for doc in matches {
            let id = doc.doc_id().ok_or_else(|| {
                StoreError::corrupt(format!("stored document in '{}' has no id", self.name))
            })?;
            if self.backend.remove(&self.name, id)? {
                if let Some(index) = &self.unique {
                    if let Some(value) = doc.unique_value() {
                        index.lock().remove(&value, id);
                    }
                }
                removed.push(doc);
            }
        }

        Ok(removed)
    }

    /// Returns every document decoded as the narrower projection `P`.
    ///
    /// Fields of the stored documents absent from `P` are skipped
    /// during decoding and never materialized. Full scan.
    pub fn find_all_projected<P: serde::de::DeserializeOwned>(&self) -> StoreResult<Vec<P>> {
        let raw = self.backend.scan(&self.name)?;
        let mut result = Vec::with_capacity(raw.len());
        for (_, bytes) in raw {
            result.push(from_cbor(&bytes)?);
        }
        Ok(result)
    }

    /// Returns the number of documents in the collection.
    pub fn count(&self) -> StoreResult<usize> {
        self.backend.len(&self.name)
    }
}

impl<T: Document> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("unique", &self.unique.is_some())
            .finish_non_exhaustive()
    }
}

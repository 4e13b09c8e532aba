//! In-memory storage backend.

use crate::backend::DocumentBackend;
use crate::error::StoreResult;
use crate::id::DocumentId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// An in-memory document backend.
///
/// Collections are created lazily on first write. Each call locks the
/// whole backend for its duration, so every individual operation is
/// atomic and nothing beyond that.
///
/// Suitable for unit tests, integration tests, and ephemeral catalogs
/// that don't need persistence.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    collections: RwLock<HashMap<String, BTreeMap<DocumentId, Vec<u8>>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every document from every collection.
    pub fn clear(&self) {
        self.collections.write().clear();
    }

    /// Returns the names of all collections that have ever been written.
    #[must_use]
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }
}

impl DocumentBackend for InMemoryBackend {
    fn put(&self, collection: &str, id: DocumentId, payload: Vec<u8>) -> StoreResult<()> {
        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, payload);
        Ok(())
    }

    fn get(&self, collection: &str, id: DocumentId) -> StoreResult<Option<Vec<u8>>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    fn remove(&self, collection: &str, id: DocumentId) -> StoreResult<bool> {
        let mut collections = self.collections.write();
        Ok(collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(&id).is_some()))
    }

    fn scan(&self, collection: &str) -> StoreResult<Vec<(DocumentId, Vec<u8>)>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, payload)| (*id, payload.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn len(&self, collection: &str) -> StoreResult<usize> {
        let collections = self.collections.read();
        Ok(collections.get(collection).map_or(0, BTreeMap::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let backend = InMemoryBackend::new();
        let id = DocumentId::new();

        backend.put("bottles", id, vec![1, 2, 3]).unwrap();
        assert_eq!(backend.get("bottles", id).unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn get_missing_returns_none() {
        let backend = InMemoryBackend::new();
        assert!(backend.get("bottles", DocumentId::new()).unwrap().is_none());
    }

    #[test]
    fn put_replaces_existing() {
        let backend = InMemoryBackend::new();
        let id = DocumentId::new();

        backend.put("bottles", id, vec![1]).unwrap();
        backend.put("bottles", id, vec![2]).unwrap();

        assert_eq!(backend.get("bottles", id).unwrap(), Some(vec![2]));
        assert_eq!(backend.len("bottles").unwrap(), 1);
    }

    #[test]
    fn remove_reports_existence() {
        let backend = InMemoryBackend::new();
        let id = DocumentId::new();

        backend.put("bottles", id, vec![1]).unwrap();
        assert!(backend.remove("bottles", id).unwrap());
        assert!(!backend.remove("bottles", id).unwrap());
        assert!(backend.get("bottles", id).unwrap().is_none());
    }

    #[test]
    fn collections_are_isolated() {
        let backend = InMemoryBackend::new();
        let id = DocumentId::new();

        backend.put("bottles", id, vec![1]).unwrap();

        assert!(backend.get("reviews", id).unwrap().is_none());
        assert_eq!(backend.len("reviews").unwrap(), 0);
        assert_eq!(backend.len("bottles").unwrap(), 1);
    }

    #[test]
    fn scan_returns_all_documents() {
        let backend = InMemoryBackend::new();
        for i in 0..3u8 {
            backend.put("bottles", DocumentId::new(), vec![i]).unwrap();
        }

        let docs = backend.scan("bottles").unwrap();
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn scan_of_unknown_collection_is_empty() {
        let backend = InMemoryBackend::new();
        assert!(backend.scan("nowhere").unwrap().is_empty());
    }

    #[test]
    fn clear_empties_everything() {
        let backend = InMemoryBackend::new();
        backend.put("bottles", DocumentId::new(), vec![1]).unwrap();
        backend.put("reviews", DocumentId::new(), vec![2]).unwrap();

        backend.clear();

        assert_eq!(backend.len("bottles").unwrap(), 0);
        assert_eq!(backend.len("reviews").unwrap(), 0);
    }
}

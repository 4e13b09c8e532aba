//! Store facade: backend plus per-collection unique indexes.

use crate::backend::DocumentBackend;
use crate::collection::Collection;
use crate::document::{from_cbor, Document};
use crate::error::StoreResult;
use crate::index::UniqueIndex;
use crate::memory::InMemoryBackend;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The main store handle.
///
/// `DocumentStore` owns the backend and hands out typed
/// [`Collection`] views. Unique indexes are built lazily, by a full
/// scan on the first typed access to a collection, and then shared by
/// every handle to that collection so concurrent saves see one
/// consistent claim table.
///
/// # Example
///
/// ```rust,ignore
/// use cavadb_store::DocumentStore;
///
/// let store = DocumentStore::in_memory();
/// let bottles = store.collection::<Bottle>("bottles")?;
/// let saved = bottles.save(bottle)?;
/// ```
pub struct DocumentStore {
    /// Raw storage shared by all collections.
    backend: Arc<dyn DocumentBackend>,
    /// Unique indexes keyed by collection name.
    indexes: RwLock<HashMap<String, Arc<Mutex<UniqueIndex>>>>,
}

impl DocumentStore {
    /// Creates a store over the given backend.
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBackend::new()))
    }

    /// Returns a handle to the underlying backend.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn DocumentBackend> {
        Arc::clone(&self.backend)
    }

    /// Opens a typed view over a collection.
    ///
    /// If `T` declares a unique field and this is the first access to
    /// `name`, the unique index is rebuilt from a scan of the stored
    /// documents; stored duplicates are reported as corruption.
    pub fn collection<T: Document>(&self, name: &str) -> StoreResult<Collection<T>> {
        let unique = match T::unique_field() {
            None => None,
            Some(field) => Some(self.unique_index::<T>(name, field)?),
        };
        Ok(Collection::new(name, Arc::clone(&self.backend), unique))
    }

    fn unique_index<T: Document>(
        &self,
        name: &str,
        field: &'static str,
    ) -> StoreResult<Arc<Mutex<UniqueIndex>>> {
        if let Some(index) = self.indexes.read().get(name) {
            return Ok(Arc::clone(index));
        }

        let mut index = UniqueIndex::new(name, field);
        let mut entries = Vec::new();
        for (id, bytes) in self.backend.scan(name)? {
            let doc: T = from_cbor(&bytes)?;
            if let Some(value) = doc.unique_value() {
                entries.push((value, id));
            }
        }
        index.rebuild(entries)?;
        debug!(collection = name, entries = index.len(), "unique index rebuilt");

        // Another thread may have built the index while we scanned;
        // whichever is registered first wins.
        let mut map = self.indexes.write();
        let index = map
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(index)));
        Ok(Arc::clone(index))
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("indexed_collections", &self.indexes.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::DocumentId;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Named {
        id: Option<DocumentId>,
        name: String,
    }

    impl Document for Named {
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

    fn named(name: &str) -> Named {
        Named {
            id: None,
            name: name.to_string(),
        }
    }

    #[test]
    fn two_handles_share_the_unique_index() {
        let store = DocumentStore::in_memory();
        let a = store.collection::<Named>("named").unwrap();
        let b = store.collection::<Named>("named").unwrap();

        a.save(named("Alpha")).unwrap();
        let err = b.save(named("Alpha")).unwrap_err();
        assert!(err.is_duplicate_key());
    }

    #[test]
    fn index_is_rebuilt_from_existing_documents() {
        let backend: Arc<dyn DocumentBackend> = Arc::new(InMemoryBackend::new());

        {
            let store = DocumentStore::new(Arc::clone(&backend));
            let coll = store.collection::<Named>("named").unwrap();
            coll.save(named("Alpha")).unwrap();
        }

        // A fresh store over the same backend rediscovers the claim.
        let store = DocumentStore::new(backend);
        let coll = store.collection::<Named>("named").unwrap();
        let err = coll.save(named("Alpha")).unwrap_err();
        assert!(err.is_duplicate_key());
    }

    #[test]
    fn distinct_collections_do_not_share_constraints() {
        let store = DocumentStore::in_memory();
        let a = store.collection::<Named>("left").unwrap();
        let b = store.collection::<Named>("right").unwrap();

        a.save(named("Alpha")).unwrap();
        assert!(b.save(named("Alpha")).is_ok());
    }
}

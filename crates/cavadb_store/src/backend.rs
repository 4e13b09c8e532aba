//! Storage backend trait.

use crate::error::StoreResult;
use crate::id::DocumentId;

/// Raw storage for encoded documents, keyed by (collection, id).
///
/// Implementations must guarantee atomicity for each individual call
/// and nothing more: there is no way to group writes across documents
/// or collections. Multi-document consistency is the responsibility
/// of the layer above.
///
/// Implementations must be safe to share across threads.
pub trait DocumentBackend: Send + Sync {
    /// Writes (inserts or replaces) a document's payload.
    fn put(&self, collection: &str, id: DocumentId, payload: Vec<u8>) -> StoreResult<()>;

    /// Reads a document's payload, or `None` if absent.
    fn get(&self, collection: &str, id: DocumentId) -> StoreResult<Option<Vec<u8>>>;

    /// Removes a document. Returns whether it existed.
    fn remove(&self, collection: &str, id: DocumentId) -> StoreResult<bool>;

    /// Returns every document in a collection.
    fn scan(&self, collection: &str) -> StoreResult<Vec<(DocumentId, Vec<u8>)>>;

    /// Returns the number of documents in a collection.
    fn len(&self, collection: &str) -> StoreResult<usize>;
}

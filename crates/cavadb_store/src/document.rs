//! Document trait and CBOR codec helpers.

use crate::error::{StoreError, StoreResult};
use crate::id::DocumentId;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Trait for types that can be stored as documents.
///
/// A document is a serde-serializable record with an optional id
/// (assigned by the store on first save) and, optionally, a single
/// field whose value must be unique across the collection.
///
/// # Example
///
/// ```rust,ignore
/// use cavadb_store::{Document, DocumentId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct User {
///     id: Option<DocumentId>,
///     email: String,
/// }
///
/// impl Document for User {
///     fn doc_id(&self) -> Option<DocumentId> {
///         self.id
///     }
///
///     fn assign_id(&mut self, id: DocumentId) {
///         self.id = Some(id);
///     }
///
///     fn unique_field() -> Option<&'static str> {
///         Some("email")
///     }
///
///     fn unique_value(&self) -> Option<String> {
///         Some(self.email.clone())
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Returns the document's id, if it has been saved.
    fn doc_id(&self) -> Option<DocumentId>;

    /// Assigns the store-generated id. Called exactly once, on first save.
    fn assign_id(&mut self, id: DocumentId);

    /// Name of the field enforced unique across the collection, if any.
    fn unique_field() -> Option<&'static str> {
        None
    }

    /// Value of the unique field for this record.
    ///
    /// Must return `Some` whenever [`Document::unique_field`] does.
    fn unique_value(&self) -> Option<String> {
        None
    }
}

/// Encodes a value to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(value, &mut bytes).map_err(|e| StoreError::codec(e.to_string()))?;
    Ok(bytes)
}

/// Decodes a value from CBOR bytes.
///
/// Fields absent from the target type are skipped, which is what
/// makes partial-field projection possible: the same stored bytes
/// decode into either the full document or a narrower view.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    ciborium::de::from_reader(bytes).map_err(|e| StoreError::codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Wide {
        id: Option<DocumentId>,
        name: String,
        year: i32,
        notes: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Narrow {
        name: String,
        year: i32,
    }

    #[test]
    fn roundtrip() {
        let doc = Wide {
            id: Some(DocumentId::new()),
            name: "test".to_string(),
            year: 2015,
            notes: vec!["a".to_string(), "b".to_string()],
        };

        let bytes = to_cbor(&doc).unwrap();
        let decoded: Wide = from_cbor(&bytes).unwrap();
        assert_eq!(doc, decoded);
    }

    #[test]
    fn narrow_decode_skips_unknown_fields() {
        let doc = Wide {
            id: Some(DocumentId::new()),
            name: "test".to_string(),
            year: 2015,
            notes: vec!["ignored".to_string()],
        };

        let bytes = to_cbor(&doc).unwrap();
        let narrow: Narrow = from_cbor(&bytes).unwrap();
        assert_eq!(narrow.name, "test");
        assert_eq!(narrow.year, 2015);
    }

    #[test]
    fn garbage_bytes_fail_with_codec_error() {
        let result: StoreResult<Wide> = from_cbor(&[0xff, 0x00, 0x12]);
        assert!(matches!(result, Err(StoreError::Codec { .. })));
    }
}

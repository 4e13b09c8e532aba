//! # CavaDB Store
//!
//! Schema-less document store layer for CavaDB.
//!
//! This crate provides:
//! - Collections of CBOR-encoded documents keyed by store-generated ids
//! - Unique single-field indexes with duplicate-key rejection
//! - Full scans, predicate queries, and partial-field projections
//! - A pluggable storage backend with an in-memory implementation
//!
//! What it does **not** provide: foreign keys, cascading
//! deletes, or multi-collection transactions. Each write is atomic for
//! a single document only; cross-document consistency is the job of
//! the layer above (`cavadb_core`).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod collection;
mod document;
mod error;
mod id;
mod index;
mod memory;
mod store;

pub use backend::DocumentBackend;
pub use collection::Collection;
pub use document::{from_cbor, to_cbor, Document};
pub use error::{StoreError, StoreResult};
pub use id::DocumentId;
pub use index::UniqueIndex;
pub use memory::InMemoryBackend;
pub use store::DocumentStore;

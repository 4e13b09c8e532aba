//! # CavaDB Core
//!
//! Referential-integrity core for a wine-cellar catalog stored in a
//! schema-less document store.
//!
//! The store below ([`cavadb_store`]) guarantees atomicity for single
//! documents only: no foreign keys, no cascading deletes, no
//! multi-collection transactions. This crate simulates those
//! relational guarantees on top:
//!
//! - **Consistency manager** ([`Catalog`]): multi-document operations
//!   (add a review to a bottle, cascade-delete a bottle and its
//!   reviews) executed as sagas with compensating actions, so either
//!   all constituent writes are visible or none are.
//! - **Join emulation** and **field projection** for reads:
//!   single-pass eager loading of the region reference, and summary
//!   listings that decode only a few fields.
//! - **Error translation**: store conflicts and lookup misses mapped
//!   to a small closed set of error kinds, plus a pure status-code
//!   mapping for transport collaborators.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
mod error;
mod model;
mod query;
mod saga;
mod status;

pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult, ResourceKind};
pub use model::{Bottle, BottleSummary, Color, Ref, Region, Review};
pub use saga::Saga;
pub use status::status_code;

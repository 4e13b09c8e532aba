//! Pure error-to-status mapping for transport collaborators.

use crate::error::CatalogError;

/// Maps a catalog error to an HTTP-equivalent status code.
///
/// Pure function over the closed error set, with no dependency on a
/// live transport framework; whatever wraps the catalog applies the
/// code to its own protocol.
#[must_use]
pub fn status_code(error: &CatalogError) -> u16 {
    match error {
        CatalogError::NotFound { .. } => 404,
        CatalogError::Conflict { .. } => 409,
        CatalogError::Storage(_) => 500,
    }
}

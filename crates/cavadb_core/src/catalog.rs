//! Catalog: consistency manager and existence guard.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult, ResourceKind};
use crate::model::{Bottle, Region, Review};
use crate::saga::Saga;
use cavadb_store::{Collection, Document, DocumentId, DocumentStore, StoreError};
use parking_lot::Mutex;
use tracing::{debug, info};

/// The catalog over bottles, reviews and regions.
///
/// This is the consistency layer: the store underneath guarantees
/// atomicity per document only, so every multi-document operation
/// here runs as a [`Saga`] whose ordering and compensations bound the
/// blast radius of a partial failure. The caller-visible contract for
/// `add_review` and `delete_bottle_cascade` is that either all
/// constituent writes are visible or none are.
///
/// Mutating operations serialize behind one lock, which closes the
/// read-modify-write race two concurrent `add_review` calls would
/// otherwise have on a bottle's `review_refs` list. Reads take no
/// lock.
pub struct Catalog {
    /// Bottles collection.
    pub(crate) bottles: Collection<Bottle>,
    /// Reviews collection.
    pub(crate) reviews: Collection<Review>,
    /// Regions collection.
    pub(crate) regions: Collection<Region>,
    /// Serializes mutating sagas.
    write_lock: Mutex<()>,
}

impl Catalog {
    /// Opens a catalog over a store with default collection names.
    pub fn open(store: &DocumentStore) -> CatalogResult<Self> {
        Self::open_with_config(store, CatalogConfig::default())
    }

    /// Opens a catalog over a store with explicit collection names.
    pub fn open_with_config(store: &DocumentStore, config: CatalogConfig) -> CatalogResult<Self> {
        Ok(Self {
            bottles: store.collection(&config.bottles)?,
            reviews: store.collection(&config.reviews)?,
            regions: store.collection(&config.regions)?,
            write_lock: Mutex::new(()),
        })
    }

    // --- Lookup / existence guard ---

    /// Resolves a bottle id to a live record, or fails with `NotFound`.
    ///
    /// Pure read, never cached; the first step of every mutating
    /// operation.
    pub fn bottle_or_fail(&self, id: DocumentId) -> CatalogResult<Bottle> {
        self.bottles
            .get(id)?
            .ok_or_else(|| CatalogError::not_found(ResourceKind::Bottle, id))
    }

    /// Resolves a region id to a live record, or fails with `NotFound`.
    pub fn region_or_fail(&self, id: DocumentId) -> CatalogResult<Region> {
        self.regions
            .get(id)?
            .ok_or_else(|| CatalogError::not_found(ResourceKind::Region, id))
    }

    // --- Consistency manager ---

    /// Adds a review to an existing bottle.
    ///
    /// Write #1 persists the review with its back-reference; write #2
    /// appends the review's id to the bottle's forward-pointer list.
    /// If write #2 fails, the review is deleted again by compensation,
    /// so no unreferenced review survives.
    pub fn add_review(
        &self,
        bottle_id: DocumentId,
        comment_text: &str,
    ) -> CatalogResult<Review> {
        let _write = self.write_lock.lock();
        let mut bottle = self.bottle_or_fail(bottle_id)?;

        let mut saga = Saga::new("add_review");

        let (review, review_id) = saga.step("save review", || {
            let review = self.reviews.save(Review::new(comment_text, bottle_id))?;
            let id = review
                .doc_id()
                .ok_or_else(|| CatalogError::Storage(StoreError::corrupt("saved review has no id")))?;
            Ok((review, id))
        })?;

        let reviews = self.reviews.clone();
        saga.on_failure("delete review", move || {
            reviews.delete(review_id)?;
            Ok(())
        });

        saga.step("append review ref", || {
            bottle.review_refs.push(review_id);
            self.bottles.save(bottle.clone())?;
            Ok(())
        })?;

        saga.finish();
        debug!(bottle = %bottle_id, review = %review_id, "review added");
        Ok(review)
    }

    /// Deletes a bottle and every review that names it.
    ///
    /// Reviews go first: if the bottle deletion then fails, what
    /// remains is a dangling bottle that is still discoverable and
    /// retryable, not orphaned reviews nothing would ever find again.
    /// The pre-delete snapshot is restored by compensation if the
    /// bottle deletion fails, so the cascade is all-or-nothing.
    pub fn delete_bottle_cascade(&self, bottle_id: DocumentId) -> CatalogResult<()> {
        let _write = self.write_lock.lock();
        self.bottle_or_fail(bottle_id)?;

        // Snapshot before deleting. Restoring it is idempotent, so
        // the same compensation also repairs a partially applied bulk
        // delete.
        let snapshot = self.reviews.find_where(|r| r.bottle_ref == bottle_id)?;
        let review_count = snapshot.len();

        let mut saga = Saga::new("delete_bottle_cascade");

        let reviews = self.reviews.clone();
        saga.on_failure("restore reviews", move || {
            for review in snapshot {
                reviews.save(review)?;
            }
            Ok(())
        });

        saga.step("delete reviews", || {
            self.reviews.delete_where(|r| r.bottle_ref == bottle_id)?;
            Ok(())
        })?;

        saga.step("delete bottle", || {
            self.bottles.delete(bottle_id)?;
            Ok(())
        })?;

        saga.finish();
        debug!(bottle = %bottle_id, reviews = review_count, "bottle cascade-deleted");
        Ok(())
    }

    // --- Plain writes (single-document, no saga needed) ---

    /// Creates a region. Fails with `Conflict` if the name is taken.
    pub fn create_region(&self, name: &str) -> CatalogResult<Region> {
        let region = self.regions.save(Region::new(name))?;
        debug!(region = %region.name, "region created");
        Ok(region)
    }

    /// Renames a region in place.
    ///
    /// The region's identity never changes; bottles referencing it by
    /// id see the new name on their next (lazy or eager) resolution.
    pub fn rename_region(&self, id: DocumentId, name: &str) -> CatalogResult<Region> {
        let mut region = self.region_or_fail(id)?;
        region.name = name.to_string();
        Ok(self.regions.save(region)?)
    }

    /// Creates a bottle. Fails with `Conflict` if the name is taken,
    /// and with `NotFound` if its region reference names no live
    /// region.
    pub fn create_bottle(&self, bottle: Bottle) -> CatalogResult<Bottle> {
        if let Some(region_ref) = &bottle.region_ref {
            if let Some(region_id) = region_ref.id() {
                self.region_or_fail(region_id)?;
            }
        }
        Ok(self.bottles.save(bottle)?)
    }

    // --- Reads over the authoritative back-reference ---

    /// Returns every review naming a bottle, by back-reference scan.
    pub fn reviews_for_bottle(&self, bottle_id: DocumentId) -> CatalogResult<Vec<Review>> {
        Ok(self.reviews.find_where(|r| r.bottle_ref == bottle_id)?)
    }

    /// Rebuilds a bottle's forward-pointer list from the authoritative
    /// back-references.
    ///
    /// The cached `review_refs` list is best-effort and can drift if a
    /// compensation ever fails or the store is mutated out-of-band;
    /// this re-derives it from a review scan and persists the repair.
    /// Returns the reconciled ids.
    pub fn reconcile_review_refs(&self, bottle_id: DocumentId) -> CatalogResult<Vec<DocumentId>> {
        let _write = self.write_lock.lock();
        let mut bottle = self.bottle_or_fail(bottle_id)?;

        let mut actual = Vec::new();
        for review in self.reviews.find_where(|r| r.bottle_ref == bottle_id)? {
            actual.push(review.doc_id().ok_or_else(|| {
                CatalogError::Storage(StoreError::corrupt("stored review has no id"))
            })?);
        }

        // Membership is the invariant; the cached order is best-effort.
        let mut cached_sorted = bottle.review_refs.clone();
        cached_sorted.sort_unstable();
        let mut actual_sorted = actual.clone();
        actual_sorted.sort_unstable();

        if cached_sorted != actual_sorted {
            info!(
                bottle = %bottle_id,
                cached = bottle.review_refs.len(),
                actual = actual.len(),
                "review refs drifted, rebuilding"
            );
            bottle.review_refs = actual.clone();
            self.bottles.save(bottle)?;
        }

        Ok(actual)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("bottles", &self.bottles.name())
            .field("reviews", &self.reviews.name())
            .field("regions", &self.regions.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let store = DocumentStore::in_memory();
        Catalog::open(&store).unwrap()
    }

    #[test]
    fn bottle_or_fail_reports_missing_id() {
        let catalog = catalog();
        let id = DocumentId::new();

        let err = catalog.bottle_or_fail(id).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn create_bottle_rejects_dead_region_reference() {
        let catalog = catalog();
        let bottle = Bottle::new("Ghost", 2001).with_region(DocumentId::new());

        let err = catalog.create_bottle(bottle).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(catalog.bottles.count().unwrap(), 0);
    }

    #[test]
    fn rename_region_keeps_identity() {
        let catalog = catalog();
        let region = catalog.create_region("Bourgogne").unwrap();
        let id = region.id.unwrap();

        let renamed = catalog.rename_region(id, "Burgundy").unwrap();
        assert_eq!(renamed.id, Some(id));

        let reread = catalog.region_or_fail(id).unwrap();
        assert_eq!(reread.name, "Burgundy");
    }

    #[test]
    fn rename_to_taken_name_conflicts() {
        let catalog = catalog();
        catalog.create_region("Alsace").unwrap();
        let region = catalog.create_region("Jura").unwrap();

        let err = catalog
            .rename_region(region.id.unwrap(), "Alsace")
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn reconcile_rebuilds_drifted_forward_list() {
        let catalog = catalog();
        let bottle = catalog.create_bottle(Bottle::new("Test", 2000)).unwrap();
        let bottle_id = bottle.id.unwrap();

        let r1 = catalog.add_review(bottle_id, "one").unwrap();
        let r2 = catalog.add_review(bottle_id, "two").unwrap();

        // Simulate drift: clobber the cached list behind the catalog's back.
        let mut damaged = catalog.bottle_or_fail(bottle_id).unwrap();
        damaged.review_refs = vec![DocumentId::new()];
        catalog.bottles.save(damaged).unwrap();

        let reconciled = catalog.reconcile_review_refs(bottle_id).unwrap();
        let mut expected = vec![r1.id.unwrap(), r2.id.unwrap()];
        expected.sort_unstable();
        let mut actual = reconciled;
        actual.sort_unstable();
        assert_eq!(actual, expected);

        let repaired = catalog.bottle_or_fail(bottle_id).unwrap();
        assert_eq!(repaired.review_refs.len(), 2);
    }

    #[test]
    fn reconcile_is_a_noop_when_consistent() {
        let catalog = catalog();
        let bottle = catalog.create_bottle(Bottle::new("Test", 2000)).unwrap();
        let bottle_id = bottle.id.unwrap();
        let review = catalog.add_review(bottle_id, "fine").unwrap();

        let reconciled = catalog.reconcile_review_refs(bottle_id).unwrap();
        assert_eq!(reconciled, vec![review.id.unwrap()]);
    }
}

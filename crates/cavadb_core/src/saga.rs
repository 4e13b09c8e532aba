//! Saga runner: ordered writes with compensating actions.

use crate::error::CatalogResult;
use tracing::{debug, warn};

type Compensation = Box<dyn FnOnce() -> CatalogResult<()> + Send>;

/// Executes a sequence of writes, undoing completed ones on failure.
///
/// The store has no multi-collection transactions, so multi-document
/// operations register a compensating action for each completed write
/// and run a later write through [`Saga::step`]. If a step fails, all
/// registered compensations run in reverse order and the step's error
/// is returned, so the caller-visible contract stays "all writes
/// visible, or none".
///
/// A compensation that itself fails cannot be retried from here; it
/// is logged at warn level (the store is then repairable via
/// reconciliation) and the original, more specific error still wins.
///
/// # Example
///
/// ```rust,ignore
/// let mut saga = Saga::new("add_review");
/// let review = saga.step("save review", || reviews.save(review))?;
/// saga.on_failure("delete review", move || reviews.delete(id));
/// saga.step("append review ref", || bottles.save(bottle))?;
/// saga.finish();
/// ```
pub struct Saga {
    /// Operation name, for logging.
    name: &'static str,
    /// Compensations for completed steps, in completion order.
    compensations: Vec<(&'static str, Compensation)>,
}

impl Saga {
    /// Starts a saga for a named operation.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            compensations: Vec::new(),
        }
    }

    /// Runs a forward action.
    ///
    /// On failure, every compensation registered so far runs in
    /// reverse order and the action's error is returned unchanged.
    pub fn step<T>(
        &mut self,
        label: &'static str,
        action: impl FnOnce() -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        match action() {
            Ok(value) => {
                debug!(saga = self.name, step = label, "step complete");
                Ok(value)
            }
            Err(err) => {
                warn!(saga = self.name, step = label, error = %err, "step failed, compensating");
                self.unwind();
                Err(err)
            }
        }
    }

    /// Registers a compensating action for a write that just completed.
    pub fn on_failure(
        &mut self,
        label: &'static str,
        compensation: impl FnOnce() -> CatalogResult<()> + Send + 'static,
    ) {
        self.compensations.push((label, Box::new(compensation)));
    }

    /// Marks the saga successful, discarding its compensations.
    pub fn finish(mut self) {
        self.compensations.clear();
    }

    fn unwind(&mut self) {
        while let Some((label, compensation)) = self.compensations.pop() {
            match compensation() {
                Ok(()) => debug!(saga = self.name, compensation = label, "compensated"),
                Err(err) => warn!(
                    saga = self.name,
                    compensation = label,
                    error = %err,
                    "compensation failed; reconcile the affected documents"
                ),
            }
        }
    }
}

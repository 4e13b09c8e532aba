//! Catalog data model.
//!
//! Three document types over three collections: regions, bottles and
//! reviews. A bottle holds a lazy, non-owning reference to its region
//! and a denormalized forward-pointer list of review ids; the
//! authoritative bottle-review relationship is the back-reference on
//! each review.

mod bottle;
mod reference;
mod region;
mod review;

pub use bottle::{Bottle, BottleSummary, Color};
pub use reference::Ref;
pub use region::Region;
pub use review::Review;

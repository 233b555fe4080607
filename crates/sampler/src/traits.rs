//! Core traits for item filtering.
//!
//! This module defines the Predicate trait that lets the individual filter
//! criteria be composed into a FilterPipeline.

use catalog::CollectionItem;

/// A single test a drawn item has to pass.
///
/// ## Design Note
/// - Predicates only borrow the item; rejected items are simply dropped by
///   the sampler, accepted ones are returned to the caller
/// - `Send + Sync` keeps pipelines usable from benches and other threads
pub trait Predicate: Send + Sync {
    /// Returns the name of this predicate (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `item` satisfies this predicate
    fn matches(&self, item: &CollectionItem) -> bool;
}

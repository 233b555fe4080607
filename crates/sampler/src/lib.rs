//! Random picking from a paginated collection, with optional filters.
//!
//! This crate provides:
//! - Predicate trait and implementations for item criteria
//! - ItemFilter / FilterPipeline for composing criteria
//! - PageIndexGenerator for injectable randomness
//! - FilteredSampler, the bounded rejection sampler
//!
//! ## Architecture
//! A pick proceeds in stages:
//! 1. The collection size is requested from the `CollectionSource`
//! 2. Random single-item pages are fetched
//! 3. Each fetched item is run through the FilterPipeline until one passes
//!
//! ## Example Usage
//! ```ignore
//! use sampler::{FilteredSampler, ItemFilter};
//!
//! let mut sampler = FilteredSampler::new(client);
//! let filter = ItemFilter::new().with_genre("jazz").with_format("vinyl");
//! let item = sampler.pick_random(&filter)?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod page_index;
pub mod sampler;
pub mod traits;

// Re-export main types
pub use filter_pipeline::{FilterPipeline, ItemFilter};
pub use page_index::{PageIndexGenerator, RandomPageIndex};
pub use sampler::{DEFAULT_MAX_ATTEMPTS, FilteredSampler};
pub use traits::Predicate;

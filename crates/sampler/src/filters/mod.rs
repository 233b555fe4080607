//! Predicate implementations for the filter pipeline.
//!
//! This module contains the concrete predicates an `ItemFilter` is built
//! from. Text predicates compare case-insensitively by substring.

pub mod artist;
pub mod format;
pub mod tags;
pub mod year;

// Re-export for convenience
pub use artist::ArtistFilter;
pub use format::FormatFilter;
pub use tags::{GenreFilter, StyleFilter};
pub use year::{ExactYearFilter, YearRangeFilter};

/// Case-insensitive substring test; `needle` must already be lowercase
pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

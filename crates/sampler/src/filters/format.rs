//! Filter on the physical format.

use super::contains_folded;
use crate::traits::Predicate;
use catalog::CollectionItem;

/// Keeps items with at least one format whose name or description contains
/// the given text, e.g. "vinyl" matches `Vinyl` and "lp" matches a vinyl
/// format described as `LP`.
pub struct FormatFilter {
    needle: String,
}

impl FormatFilter {
    pub fn new(format: &str) -> Self {
        Self {
            needle: format.to_lowercase(),
        }
    }
}

impl Predicate for FormatFilter {
    fn name(&self) -> &str {
        "FormatFilter"
    }

    fn matches(&self, item: &CollectionItem) -> bool {
        item.formats.iter().any(|format| {
            contains_folded(&format.name, &self.needle)
                || format
                    .descriptions
                    .iter()
                    .any(|description| contains_folded(description, &self.needle))
        })
    }
}

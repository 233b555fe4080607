//! Filters on the categorical tags Discogs attaches to a release.

use super::contains_folded;
use crate::traits::Predicate;
use catalog::CollectionItem;

/// Keeps items with a genre containing the given text ("rock" matches "Rock"
/// and "Folk, World, & Country" matches "country")
pub struct GenreFilter {
    needle: String,
}

impl GenreFilter {
    pub fn new(genre: &str) -> Self {
        Self {
            needle: genre.to_lowercase(),
        }
    }
}

impl Predicate for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn matches(&self, item: &CollectionItem) -> bool {
        item.genres
            .iter()
            .any(|genre| contains_folded(genre, &self.needle))
    }
}

/// Keeps items with a style containing the given text, e.g. "bop" matches
/// both "Hard Bop" and "Bebop"
pub struct StyleFilter {
    needle: String,
}

impl StyleFilter {
    pub fn new(style: &str) -> Self {
        Self {
            needle: style.to_lowercase(),
        }
    }
}

impl Predicate for StyleFilter {
    fn name(&self) -> &str {
        "StyleFilter"
    }

    fn matches(&self, item: &CollectionItem) -> bool {
        item.styles
            .iter()
            .any(|style| contains_folded(style, &self.needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_item() -> CollectionItem {
        let mut item = CollectionItem::new(1, "Blue Train");
        item.genres = vec!["Jazz".to_string()];
        item.styles = vec!["Hard Bop".to_string()];
        item
    }

    #[test]
    fn test_genre_filter() {
        let item = create_test_item();
        assert!(GenreFilter::new("jazz").matches(&item));
        assert!(GenreFilter::new("JA").matches(&item));
        assert!(!GenreFilter::new("Rock").matches(&item));
    }

    #[test]
    fn test_style_filter() {
        let item = create_test_item();
        assert!(StyleFilter::new("bop").matches(&item));
        assert!(!StyleFilter::new("Modal").matches(&item));
        // genres are not styles
        assert!(!StyleFilter::new("jazz").matches(&item));
    }
}

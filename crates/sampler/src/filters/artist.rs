//! Filter on the credited artists.

use super::contains_folded;
use crate::traits::Predicate;
use catalog::CollectionItem;

/// Keeps items whose artist label contains the given text.
///
/// The label is the comma-joined list of all credited artists, so a
/// search for "coltrane" also finds "Miles Davis, John Coltrane".
pub struct ArtistFilter {
    needle: String,
}

impl ArtistFilter {
    pub fn new(artist: &str) -> Self {
        Self {
            needle: artist.to_lowercase(),
        }
    }
}

impl Predicate for ArtistFilter {
    fn name(&self) -> &str {
        "ArtistFilter"
    }

    fn matches(&self, item: &CollectionItem) -> bool {
        contains_folded(&item.artists.join(", "), &self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_filter() {
        let mut item = CollectionItem::new(1, "Kind Of Blue");
        item.artists = vec!["Miles Davis".to_string(), "John Coltrane".to_string()];

        assert!(ArtistFilter::new("miles").matches(&item));
        assert!(ArtistFilter::new("COLTRANE").matches(&item));
        assert!(!ArtistFilter::new("Monk").matches(&item));
        assert!(!ArtistFilter::new("miles").matches(&CollectionItem::new(2, "No credits")));
    }
}

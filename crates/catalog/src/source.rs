//! The seam between the sampler and whatever serves collection pages.

use crate::error::Result;
use crate::types::CollectionPage;

/// Anything that can serve 1-based pages of a collection.
///
/// The HTTP client implements this against the Discogs API; tests implement
/// it over an in-memory list.
pub trait CollectionSource {
    /// Fetch page `page` (1-based) holding up to `per_page` items
    fn fetch_page(&self, page: u64, per_page: u32) -> Result<CollectionPage>;

    /// Total number of items in the collection
    ///
    /// Implemented as a single-item page fetch that only reads the reported
    /// total from the envelope.
    fn fetch_collection_size(&self) -> Result<u64> {
        Ok(self.fetch_page(1, 1)?.total_items)
    }
}

impl<S: CollectionSource + ?Sized> CollectionSource for &S {
    fn fetch_page(&self, page: u64, per_page: u32) -> Result<CollectionPage> {
        (**self).fetch_page(page, per_page)
    }

    fn fetch_collection_size(&self) -> Result<u64> {
        (**self).fetch_collection_size()
    }
}

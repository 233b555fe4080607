//! Rejection sampling over a paginated collection.
//!
//! The collection size is only known through the remote envelope, so every
//! pick starts with a size request and then fetches single-item pages at
//! random indices until the filter accepts one.

use catalog::{CollectionItem, CollectionSource, PickerError, Result};
use tracing::{debug, info};

use crate::filter_pipeline::ItemFilter;
use crate::page_index::{PageIndexGenerator, RandomPageIndex};

/// How many items are drawn before a filtered pick gives up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Picks random items from a `CollectionSource`, optionally filtered.
///
/// ## Algorithm
/// 1. Ask the source for the collection size; zero fails with `EmptyCollection`
/// 2. Identity filter: fetch exactly one random single-item page
/// 3. Otherwise draw a fresh page in `1..=size` per attempt (with
///    replacement) until the filter matches or `max_attempts` is spent
pub struct FilteredSampler<S, G = RandomPageIndex> {
    source: S,
    pages: G,
    max_attempts: u32,
}

impl<S: CollectionSource> FilteredSampler<S, RandomPageIndex> {
    /// Create a sampler drawing pages from the OS-seeded generator
    pub fn new(source: S) -> Self {
        Self::with_page_index(source, RandomPageIndex::new())
    }
}

impl<S: CollectionSource, G: PageIndexGenerator> FilteredSampler<S, G> {
    /// Create a sampler with an explicit page index generator
    pub fn with_page_index(source: S, pages: G) -> Self {
        Self {
            source,
            pages,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Configure the attempt ceiling for filtered picks (default: 50, minimum: 1)
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of items in the collection
    pub fn size(&self) -> Result<u64> {
        self.source.fetch_collection_size()
    }

    /// Pick a random item matching `filter`
    ///
    /// # Returns
    /// * `Ok(item)` - the first drawn item that matched
    /// * `Err(EmptyCollection)` - the collection reports zero items; no page is fetched
    /// * `Err(NoMatchFound)` - `max_attempts` draws without a match
    /// * any client error unchanged, including `ApiError` for an empty page
    pub fn pick_random(&mut self, filter: &ItemFilter) -> Result<CollectionItem> {
        let size = self.size()?;
        debug!("Collection size: {} items", size);

        if size == 0 {
            return Err(PickerError::EmptyCollection);
        }

        let pipeline = filter.pipeline();
        if pipeline.is_empty() {
            let item = self.fetch_random(size)?;
            info!("Picked {}", item);
            return Ok(item);
        }

        for attempt in 1..=self.max_attempts {
            let item = self.fetch_random(size)?;
            if pipeline.matches(&item) {
                info!("Picked {} after {} attempt(s)", item, attempt);
                return Ok(item);
            }
            debug!("Attempt {}/{}: {} did not match", attempt, self.max_attempts, item);
        }

        Err(PickerError::NoMatchFound {
            attempts: self.max_attempts,
        })
    }

    /// Fetch the single item on a random page in `1..=size`
    ///
    /// An empty page inside the reported range means the remote collection
    /// changed between the size request and this fetch; that is reported
    /// rather than retried.
    fn fetch_random(&mut self, size: u64) -> Result<CollectionItem> {
        let page = self.pages.next_page(size);
        debug_assert!((1..=size).contains(&page), "page {page} outside 1..={size}");

        self.source.fetch_page(page, 1)?.into_first().ok_or_else(|| {
            PickerError::api(format!(
                "Page {} of {} reported items came back empty",
                page, size
            ))
        })
    }
}

//! Filter criteria and the pipeline that evaluates them.
//!
//! `ItemFilter` is the plain set of optional criteria a caller fills in;
//! `FilterPipeline` is the chain of predicates built from it. An empty
//! pipeline is the identity filter.

use crate::filters::*;
use crate::traits::Predicate;
use catalog::CollectionItem;

/// Optional criteria a picked item has to satisfy.
///
/// ## Usage
/// ```ignore
/// let filter = ItemFilter::new()
///     .with_genre("jazz")
///     .with_year_range(Some(1955), Some(1965));
///
/// let item = sampler.pick_random(&filter)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub genre: Option<String>,
    pub style: Option<String>,
    pub year: Option<u16>,
    pub artist: Option<String>,
    pub format: Option<String>,
    pub min_year: Option<u16>,
    pub max_year: Option<u16>,
}

/// Blank text never restricts anything, so it counts as "not set"
fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ItemFilter {
    /// The identity filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = non_blank(genre);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = non_blank(style);
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = non_blank(artist);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = non_blank(format);
        self
    }

    /// Inclusive bounds; either may be left open. No ordering is enforced.
    pub fn with_year_range(mut self, min_year: Option<u16>, max_year: Option<u16>) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    /// True when no criterion is set, i.e. every item matches
    pub fn is_identity(&self) -> bool {
        self.genre.is_none()
            && self.style.is_none()
            && self.year.is_none()
            && self.artist.is_none()
            && self.format.is_none()
            && self.min_year.is_none()
            && self.max_year.is_none()
    }

    /// Build the predicate chain for these criteria
    pub fn pipeline(&self) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();
        if let Some(genre) = &self.genre {
            pipeline = pipeline.add_filter(GenreFilter::new(genre));
        }
        if let Some(style) = &self.style {
            pipeline = pipeline.add_filter(StyleFilter::new(style));
        }
        if let Some(year) = self.year {
            pipeline = pipeline.add_filter(ExactYearFilter::new(year));
        }
        if let Some(format) = &self.format {
            pipeline = pipeline.add_filter(FormatFilter::new(format));
        }
        if let Some(artist) = &self.artist {
            pipeline = pipeline.add_filter(ArtistFilter::new(artist));
        }
        if self.min_year.is_some() || self.max_year.is_some() {
            pipeline = pipeline.add_filter(YearRangeFilter::new(self.min_year, self.max_year));
        }
        pipeline
    }

    /// Evaluate all criteria against one item
    ///
    /// Convenience for one-off checks: a fresh pipeline is built on every
    /// call. Build it once with `pipeline()` when testing many items.
    pub fn matches(&self, item: &CollectionItem) -> bool {
        self.pipeline().matches(item)
    }
}

/// Chains predicates together; an item passes if it passes all of them.
pub struct FilterPipeline {
    filters: Vec<Box<dyn Predicate>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a predicate to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Predicate + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// An empty pipeline lets everything through
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Apply all predicates in order, stopping at the first rejection.
    pub fn matches(&self, item: &CollectionItem) -> bool {
        for filter in &self.filters {
            if !filter.matches(item) {
                tracing::debug!("{} rejected item {}", filter.name(), item.id);
                return false;
            }
        }
        true
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

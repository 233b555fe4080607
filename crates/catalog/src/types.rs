//! Core domain types for a remote record collection.
//!
//! Items and pages only live for the duration of one sampling operation;
//! nothing here is persisted. The history crate snapshots the label fields
//! it needs instead of holding on to a `CollectionItem`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Discogs release identifier; every copy of the same release in a
/// collection shares it
pub type ItemId = u64;

/// Label used wherever a field is missing from the remote record
pub const UNKNOWN_LABEL: &str = "Unknown";

// =============================================================================
// Collection Item
// =============================================================================

/// One physical format entry of a release, e.g. `Vinyl` with `["LP", "Album"]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseFormat {
    pub name: String,
    pub descriptions: Vec<String>,
}

impl ReleaseFormat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptions: Vec::new(),
        }
    }

    pub fn with_descriptions<I, S>(mut self, descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptions = descriptions.into_iter().map(Into::into).collect();
        self
    }
}

/// An item of the user's collection as decoded from a remote page.
///
/// Two items are the same item if their `id`s are equal; all other fields
/// are display labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub id: ItemId,
    pub title: String,
    /// Contributor (artist) names in credit order
    pub artists: Vec<String>,
    /// Release year, `None` when the remote side reports it as unknown
    pub year: Option<u16>,
    pub formats: Vec<ReleaseFormat>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub cover_image: Option<String>,
}

impl CollectionItem {
    /// Creates an item with the given identity and title and no other labels
    pub fn new(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artists: Vec::new(),
            year: None,
            formats: Vec::new(),
            genres: Vec::new(),
            styles: Vec::new(),
            cover_image: None,
        }
    }

    /// Artist names joined for display, e.g. `"Miles Davis, John Coltrane"`
    pub fn artists_label(&self) -> String {
        if self.artists.is_empty() {
            return UNKNOWN_LABEL.to_string();
        }
        self.artists.join(", ")
    }

    /// Year as text, `"Unknown"` when not known
    pub fn year_label(&self) -> String {
        self.year
            .map(|year| year.to_string())
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    pub fn formats_label(&self) -> String {
        self.formats
            .iter()
            .map(|format| {
                if format.descriptions.is_empty() {
                    format.name.clone()
                } else {
                    format!("{} ({})", format.name, format.descriptions.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn genres_label(&self) -> String {
        self.genres.join(", ")
    }

    pub fn styles_label(&self) -> String {
        self.styles.join(", ")
    }
}

impl std::fmt::Display for CollectionItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.artists_label(),
            self.title,
            self.year_label()
        )
    }
}

// =============================================================================
// Collection Page
// =============================================================================

/// One fetched slice of the collection together with the reported total
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionPage {
    /// Total number of items in the whole collection, as reported with this page
    pub total_items: u64,
    pub items: Vec<CollectionItem>,
}

impl CollectionPage {
    pub fn new(total_items: u64, items: Vec<CollectionItem>) -> Self {
        Self { total_items, items }
    }

    /// Consumes the page and returns its first item, if any
    pub fn into_first(self) -> Option<CollectionItem> {
        self.items.into_iter().next()
    }
}

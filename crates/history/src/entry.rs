//! A single recorded listen.

use catalog::{CollectionItem, ItemId, UNKNOWN_LABEL};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Returned when a rating outside 1..=5 is given
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Rating must be between 1 and 5, got {0}")]
pub struct InvalidRating(pub u8);

/// A star rating from 1 to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Result<Self, InvalidRating> {
        if (Self::MIN..=Self::MAX).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(InvalidRating(stars))
        }
    }

    pub fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = InvalidRating;

    fn try_from(stars: u8) -> Result<Self, Self::Error> {
        Self::new(stars)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn unknown() -> String {
    UNKNOWN_LABEL.to_string()
}

/// Records without a timestamp count as listened to when they are read
fn listened_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Older files store the year as a JSON number
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}

/// One listen of a collection item.
///
/// The labels are a snapshot taken when the entry was recorded; they are
/// never refreshed from the remote collection. Several entries may share an
/// `item_id` when an item is picked again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// `0` when the record does not name an item
    #[serde(rename = "discogs_id", default)]
    item_id: ItemId,
    #[serde(default = "unknown")]
    artist: String,
    #[serde(default = "unknown")]
    title: String,
    /// Free text; usually a four digit year, `"Unknown"` otherwise
    #[serde(default = "unknown", deserialize_with = "text_or_number")]
    year: String,
    #[serde(rename = "listened_date", default = "listened_now")]
    listened_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<Rating>,
    #[serde(rename = "notes", default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl HistoryEntry {
    pub fn new(
        item_id: ItemId,
        artist: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
        listened_at: NaiveDateTime,
    ) -> Self {
        Self {
            item_id,
            artist: artist.into(),
            title: title.into(),
            year: year.into(),
            listened_at,
            rating: None,
            note: None,
        }
    }

    /// Snapshot the labels of a picked item
    pub fn from_item(item: &CollectionItem, listened_at: NaiveDateTime) -> Self {
        Self::new(
            item.id,
            item.artists_label(),
            item.title.clone(),
            item.year_label(),
            listened_at,
        )
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attach a note; blank text is dropped
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn listened_at(&self) -> NaiveDateTime {
        self.listened_at
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Decade label such as `"1980s"`, or `None` when the year is not numeric
    pub fn decade(&self) -> Option<String> {
        let year: i32 = self.year.trim().parse().ok()?;
        Some(format!("{}s", year.div_euclid(10) * 10))
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {} ({})", self.artist, self.title, self.year)
    }
}

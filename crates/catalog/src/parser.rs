//! Decoder for Discogs collection pages.
//!
//! The endpoint `users/{name}/collection/folders/{id}/releases` answers with
//! an envelope like:
//!
//! ```text
//! {
//!   "pagination": { "page": 3, "pages": 120, "per_page": 1, "items": 120 },
//!   "releases": [
//!     { "id": 2464521,
//!       "basic_information": {
//!         "title": "Kind Of Blue", "year": 1959,
//!         "artists": [{ "name": "Miles Davis" }],
//!         "formats": [{ "name": "Vinyl", "descriptions": ["LP", "Album"] }],
//!         "genres": ["Jazz"], "styles": ["Modal"],
//!         "cover_image": "https://...", "thumb": "https://..." } } ]
//! }
//! ```
//!
//! Only the fields the picker needs are decoded; everything else is ignored.

use crate::error::{PickerError, Result};
use crate::types::*;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PageEnvelope {
    pagination: Pagination,
    #[serde(default)]
    releases: Vec<ReleaseRecord>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    items: u64,
}

#[derive(Debug, Deserialize)]
struct ReleaseRecord {
    id: ItemId,
    basic_information: BasicInformation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BasicInformation {
    title: Option<String>,
    year: Option<u16>,
    artists: Vec<ArtistRef>,
    formats: Vec<FormatRef>,
    genres: Vec<String>,
    styles: Vec<String>,
    cover_image: Option<String>,
    thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct FormatRef {
    name: String,
    #[serde(default)]
    descriptions: Vec<String>,
}

/// Parse the JSON body of a collection page response
///
/// Any structural mismatch is an `ApiError`: the server answered with a
/// success status but the payload is not a collection page.
pub fn parse_page(body: &str) -> Result<CollectionPage> {
    let envelope: PageEnvelope = serde_json::from_str(body)
        .map_err(|e| PickerError::api(format!("Malformed collection page: {}", e)))?;

    let items = envelope
        .releases
        .into_iter()
        .map(ReleaseRecord::into_item)
        .collect();

    Ok(CollectionPage::new(envelope.pagination.items, items))
}

impl ReleaseRecord {
    fn into_item(self) -> CollectionItem {
        let info = self.basic_information;

        CollectionItem {
            id: self.id,
            title: non_empty(info.title).unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            artists: info
                .artists
                .iter()
                .map(|artist| strip_disambiguation(&artist.name).to_string())
                .collect(),
            // Discogs uses 0 for "year unknown"
            year: info.year.filter(|&year| year > 0),
            formats: info
                .formats
                .into_iter()
                .map(|format| ReleaseFormat {
                    name: format.name,
                    descriptions: format.descriptions,
                })
                .collect(),
            genres: info.genres,
            styles: info.styles,
            cover_image: non_empty(info.cover_image).or_else(|| non_empty(info.thumb)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Remove the numeric disambiguation suffix Discogs appends to artist names
///
/// Example: "Nirvana (2)" -> "Nirvana"
///          "Sunn O)))"   -> "Sunn O)))"
fn strip_disambiguation(name: &str) -> &str {
    let trimmed = name.trim_end();
    let Some(start) = trimmed.rfind(" (") else {
        return trimmed;
    };
    let Some(inner) = trimmed[start + 2..].strip_suffix(')') else {
        return trimmed;
    };
    if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
        &trimmed[..start]
    } else {
        trimmed
    }
}

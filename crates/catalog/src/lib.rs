//! # Catalog Crate
//!
//! Shared vocabulary for picking random records from a Discogs collection.
//!
//! ## Main Components
//!
//! - **types**: Domain types (CollectionItem, ReleaseFormat, CollectionPage)
//! - **parser**: Decode Discogs collection page JSON into those types
//! - **source**: The `CollectionSource` trait the sampler draws pages from
//! - **error**: The `PickerError` taxonomy used by every crate in the workspace
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{parser, CollectionSource};
//!
//! let page = parser::parse_page(&body)?;
//! println!("{} items in collection", page.total_items);
//! for item in &page.items {
//!     println!("{item}");
//! }
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod source;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{PickerError, Result};
pub use source::CollectionSource;
pub use types::{CollectionItem, CollectionPage, ItemId, ReleaseFormat, UNKNOWN_LABEL};

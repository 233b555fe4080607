//! # History Crate
//!
//! Local record of which collection items were picked and listened to.
//!
//! ## Main Components
//!
//! - **entry**: `HistoryEntry`, a snapshot of one listen, and its `Rating`
//! - **store**: `HistoryStore`, the JSON file the entries live in
//! - **statistics**: frequency tables by artist, year and decade
//! - **export**: CSV, HTML and Markdown renderings of the log
//!
//! ## Example Usage
//!
//! ```ignore
//! use history::{HistoryEntry, HistoryStore};
//!
//! let store = HistoryStore::new("listening_history.json");
//! store.append(HistoryEntry::from_item(&item, chrono::Local::now().naive_local()))?;
//!
//! for entry in store.recent(Some(5))? {
//!     println!("{entry}");
//! }
//! let stats = store.aggregate()?;
//! ```

pub mod entry;
pub mod export;
pub mod statistics;
pub mod store;

pub use entry::{HistoryEntry, InvalidRating, Rating};
pub use export::{export_to_file, ExportFormat};
pub use statistics::Statistics;
pub use store::HistoryStore;

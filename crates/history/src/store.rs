//! JSON file backed listening history.
//!
//! The whole document is read for every operation and rewritten for every
//! change. Writes land in a sibling `.tmp` file that is then renamed over the
//! real one, so an interrupted write leaves the previous document intact.
//! There is no locking: two processes writing at once may lose an update.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use catalog::{ItemId, PickerError, Result};
use tracing::{debug, info, warn};

use crate::entry::HistoryEntry;
use crate::statistics::Statistics;

/// Append-only log of listens stored as a JSON array
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Default file name used when nothing else is configured
    pub const DEFAULT_FILE: &'static str = "listening_history.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in recording order
    ///
    /// A missing, blank or `null` file is an empty history. Records that fail to
    /// decode are skipped with a warning; a document that is not a JSON
    /// array is an error.
    pub fn load(&self) -> Result<Vec<HistoryEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No history file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        // `null` is an empty history as well
        let records: Vec<serde_json::Value> =
            serde_json::from_str::<Option<Vec<serde_json::Value>>>(&content)
                .map_err(|e| self.io_error(io::Error::new(io::ErrorKind::InvalidData, e)))?
                .unwrap_or_default();

        let total = records.len();
        let mut entries = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<HistoryEntry>(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    "Skipping malformed history record #{} in {}: {}",
                    index,
                    self.path.display(),
                    e
                ),
            }
        }

        debug!("Loaded {}/{} history entries", entries.len(), total);
        Ok(entries)
    }

    /// Record one listen at the end of the log
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.load()?;
        info!("Recording {} in {}", entry, self.path.display());
        entries.push(entry);
        self.save(&entries)
    }

    pub fn contains_identifier(&self, id: ItemId) -> Result<bool> {
        Ok(self.load()?.iter().any(|entry| entry.item_id() == id))
    }

    /// How many times the item has been recorded
    pub fn count_by_identifier(&self, id: ItemId) -> Result<usize> {
        Ok(self
            .load()?
            .iter()
            .filter(|entry| entry.item_id() == id)
            .count())
    }

    /// Newest entries first, at most `limit` of them (`None` returns all)
    ///
    /// Entries with equal timestamps come out most recently recorded first.
    pub fn recent(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.load()?;
        entries.reverse();
        entries.sort_by(|a, b| b.listened_at().cmp(&a.listened_at()));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    /// Replace the log with an empty one
    pub fn clear(&self) -> Result<()> {
        warn!("Clearing listening history at {}", self.path.display());
        self.save(&[])
    }

    pub fn aggregate(&self) -> Result<Statistics> {
        Ok(Statistics::from_entries(&self.load()?))
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| self.io_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        debug!("Wrote {} history entries", entries.len());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: io::Error) -> PickerError {
        PickerError::HistoryIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

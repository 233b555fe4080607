//! Aggregate counts over the listening history.

use std::collections::BTreeMap;

use crate::entry::HistoryEntry;

/// Frequency tables and their most common keys.
///
/// When two keys share the highest count, the `most_*` field holds the one
/// that reached that count first while walking the history in recording
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub by_artist: BTreeMap<String, usize>,
    pub by_year: BTreeMap<String, usize>,
    /// Only entries with a numeric year are counted here
    pub by_decade: BTreeMap<String, usize>,
    pub most_listened_artist: Option<String>,
    pub most_popular_year: Option<String>,
    pub most_popular_decade: Option<String>,
}

/// Running arg-max over one frequency table
#[derive(Default)]
struct Tally {
    counts: BTreeMap<String, usize>,
    leader: Option<(String, usize)>,
}

impl Tally {
    fn add(&mut self, key: &str) {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        let count = *count;

        let ahead = match &self.leader {
            Some((_, best)) => count > *best,
            None => true,
        };
        if ahead {
            self.leader = Some((key.to_string(), count));
        }
    }

    fn finish(self) -> (BTreeMap<String, usize>, Option<String>) {
        (self.counts, self.leader.map(|(key, _)| key))
    }
}

impl Statistics {
    /// Single pass over `entries`
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let mut artists = Tally::default();
        let mut years = Tally::default();
        let mut decades = Tally::default();

        for entry in entries {
            artists.add(entry.artist());
            years.add(entry.year());
            if let Some(decade) = entry.decade() {
                decades.add(&decade);
            }
        }

        let (by_artist, most_listened_artist) = artists.finish();
        let (by_year, most_popular_year) = years.finish();
        let (by_decade, most_popular_decade) = decades.finish();

        Self {
            total: entries.len(),
            by_artist,
            by_year,
            by_decade,
            most_listened_artist,
            most_popular_year,
            most_popular_decade,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The `n` most listened artists, highest count first
    pub fn top_artists(&self, n: usize) -> Vec<(&str, usize)> {
        top_n(&self.by_artist, n)
    }

    /// The `n` most listened years, highest count first
    pub fn top_years(&self, n: usize) -> Vec<(&str, usize)> {
        top_n(&self.by_year, n)
    }
}

/// Sort by count descending; equal counts keep key order
fn top_n(table: &BTreeMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
    let mut ranked: Vec<(&str, usize)> = table
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

//! Integration tests for the JSON history store.
//!
//! Every test works in its own scratch directory.

use chrono::{NaiveDate, NaiveDateTime};
use history::{export_to_file, ExportFormat, HistoryEntry, HistoryStore, Rating};
use catalog::{CollectionItem, PickerError};
use std::fs;
use tempfile::TempDir;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, 30, 0)
        .unwrap()
}

fn create_store() -> (TempDir, HistoryStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::new(dir.path().join("listening_history.json"));
    (dir, store)
}

fn entry(id: u64, artist: &str, year: &str, when: NaiveDateTime) -> HistoryEntry {
    HistoryEntry::new(id, artist, format!("Album {id}"), year, when)
}

#[test]
fn test_missing_file_is_empty_history() {
    let (_dir, store) = create_store();
    assert!(store.load().unwrap().is_empty());
    assert!(store.recent(None).unwrap().is_empty());
    assert!(!store.contains_identifier(1).unwrap());
    assert_eq!(store.aggregate().unwrap().total, 0);
}

#[test]
fn test_blank_file_is_empty_history() {
    let (_dir, store) = create_store();
    fs::write(store.path(), "  \n").unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_null_document_is_empty_history() {
    let (_dir, store) = create_store();
    fs::write(store.path(), "null").unwrap();
    assert!(store.load().unwrap().is_empty());

    store.append(entry(1, "Can", "1971", at(1, 20))).unwrap();
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn test_numeric_year_is_loaded_and_kept() {
    let (_dir, store) = create_store();
    fs::write(
        store.path(),
        r#"[{"discogs_id": 1, "artist": "Kate Bush", "title": "Hounds Of Love", "year": 1985, "listened_date": "2024-06-01T20:30:00"}]"#,
    )
    .unwrap();

    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].year(), "1985");
    assert_eq!(store.aggregate().unwrap().by_decade["1980s"], 1);

    // rewritten as text and not dropped by the next append
    store.append(entry(2, "Can", "1971", at(2, 20))).unwrap();
    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(fs::read_to_string(store.path()).unwrap().contains(r#""year": "1985""#));
}

#[test]
fn test_missing_id_and_date_are_defaulted() {
    let (_dir, store) = create_store();
    fs::write(store.path(), r#"[{"artist": "Faust", "title": "IV", "year": "1973"}]"#).unwrap();

    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].item_id(), 0);
    assert_eq!(entries[0].title(), "IV");

    store.append(entry(2, "Can", "1971", at(2, 20))).unwrap();
    assert_eq!(store.load().unwrap().len(), 2);
}

#[test]
fn test_append_then_recent_one() {
    let (_dir, store) = create_store();
    store.append(entry(1, "Can", "1971", at(1, 20))).unwrap();
    let latest = entry(2, "Neu!", "1972", at(2, 20));
    store.append(latest.clone()).unwrap();

    assert_eq!(store.recent(Some(1)).unwrap(), vec![latest]);
    assert!(store.recent(Some(0)).unwrap().is_empty());
}

#[test]
fn test_recent_orders_by_timestamp_not_insertion() {
    let (_dir, store) = create_store();
    store.append(entry(1, "A", "1970", at(3, 10))).unwrap();
    store.append(entry(2, "B", "1980", at(1, 10))).unwrap();
    store.append(entry(3, "C", "1990", at(5, 10))).unwrap();
    store.append(entry(4, "D", "2000", at(2, 10))).unwrap();

    let ids: Vec<u64> = store
        .recent(None)
        .unwrap()
        .iter()
        .map(|e| e.item_id())
        .collect();
    assert_eq!(ids, vec![3, 1, 4, 2]);

    let recent = store.recent(None).unwrap();
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].listened_at() >= pair[1].listened_at()));

    // load keeps recording order
    let ids: Vec<u64> = store.load().unwrap().iter().map(|e| e.item_id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn test_relistens_are_counted() {
    let (_dir, store) = create_store();
    store.append(entry(42, "Can", "1971", at(1, 20))).unwrap();
    store.append(entry(7, "Neu!", "1972", at(2, 20))).unwrap();
    store.append(entry(42, "Can", "1971", at(3, 20))).unwrap();

    assert!(store.contains_identifier(42).unwrap());
    assert_eq!(store.count_by_identifier(42).unwrap(), 2);
    assert_eq!(store.count_by_identifier(7).unwrap(), 1);
    assert!(!store.contains_identifier(99).unwrap());
    assert_eq!(store.count_by_identifier(99).unwrap(), 0);
}

#[test]
fn test_aggregate_years_and_decades() {
    let (_dir, store) = create_store();
    store.append(entry(1, "Talking Heads", "1980", at(1, 20))).unwrap();
    store.append(entry(2, "The Cure", "1980", at(2, 20))).unwrap();
    store.append(entry(3, "Nirvana", "1990", at(3, 20))).unwrap();

    let stats = store.aggregate().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_year.len(), 2);
    assert_eq!(stats.by_year["1980"], 2);
    assert_eq!(stats.by_year["1990"], 1);
    assert_eq!(stats.most_popular_year.as_deref(), Some("1980"));
    assert_eq!(stats.by_decade.len(), 2);
    assert_eq!(stats.by_decade["1980s"], 2);
    assert_eq!(stats.by_decade["1990s"], 1);
    assert_eq!(stats.most_popular_decade.as_deref(), Some("1980s"));
}

#[test]
fn test_round_trip_keeps_every_field() {
    let (_dir, store) = create_store();

    let mut item = CollectionItem::new(1234, "Blue Train");
    item.artists = vec!["John Coltrane".to_string()];
    item.year = Some(1957);
    let when = NaiveDate::from_ymd_opt(2024, 2, 29)
        .unwrap()
        .and_hms_milli_opt(23, 59, 58, 125)
        .unwrap();
    let original = HistoryEntry::from_item(&item, when)
        .with_rating(Rating::new(5).unwrap())
        .with_note("mono pressing");

    store.append(original.clone()).unwrap();

    // a fresh store over the same file sees the same entry
    let reopened = HistoryStore::new(store.path());
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded, vec![original]);
    assert_eq!(loaded[0].note(), Some("mono pressing"));
    assert_eq!(loaded[0].rating().map(Rating::stars), Some(5));
    assert_eq!(loaded[0].listened_at(), when);
}

#[test]
fn test_malformed_record_is_skipped() {
    let (_dir, store) = create_store();
    let document = r#"[
        {"discogs_id": 1, "artist": "Can", "title": "Tago Mago", "year": "1971", "listened_date": "2024-06-01T20:30:00"},
        {"discogs_id": "not a number", "listened_date": "yesterday"},
        {"discogs_id": 2, "artist": "Neu!", "title": "Neu! 75", "year": "1975", "listened_date": "2024-06-02T20:30:00", "rating": 4},
        {"discogs_id": 3, "artist": "Faust", "title": "IV", "year": "1973", "listened_date": "2024-06-03T20:30:00", "notes": "loud"}
    ]"#;
    fs::write(store.path(), document).unwrap();

    let entries = store.load().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].rating().map(Rating::stars), Some(4));

    // appending keeps the good records and drops the broken one
    store.append(entry(4, "Cluster", "1974", at(4, 20))).unwrap();
    assert_eq!(store.load().unwrap().len(), 4);
}

#[test]
fn test_non_array_document_is_an_error() {
    let (_dir, store) = create_store();
    fs::write(store.path(), r#"{"entries": []}"#).unwrap();

    let err = store.load().unwrap_err();
    match err {
        PickerError::HistoryIo { path, source } => {
            assert_eq!(path, store.path());
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
        }
        other => panic!("expected HistoryIo, got {other:?}"),
    }
    // a broken document is not overwritten by an append
    assert!(store.append(entry(1, "A", "1970", at(1, 1))).is_err());
}

#[test]
fn test_clear() {
    let (_dir, store) = create_store();
    store.append(entry(1, "Can", "1971", at(1, 20))).unwrap();
    store.clear().unwrap();

    assert!(store.load().unwrap().is_empty());
    assert_eq!(fs::read_to_string(store.path()).unwrap().trim(), "[]");
}

#[test]
fn test_write_creates_parent_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.json");
    let store = HistoryStore::new(&path);

    store.append(entry(1, "Can", "1971", at(1, 20))).unwrap();

    assert!(path.exists());
    let names: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("history.json")]);
}

#[test]
fn test_export_to_file() {
    let (dir, store) = create_store();
    store.append(entry(1, "Can", "1971", at(1, 20))).unwrap();
    store.append(entry(2, "Neu!", "1972", at(2, 20))).unwrap();

    let output = dir.path().join("history.csv");
    export_to_file(ExportFormat::Csv, &store.load().unwrap(), &output).unwrap();

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).unwrap().starts_with("1,\"Can\""));
}

//! Calculation history: in-memory session history and durable lookups.
//!
//! `SessionHistory` is the owned, append-only collection a single front end
//! keeps for its session. `load_recent_records` merges the live JSONL log
//! with the CSV archive for the "most recent N" view.

use crate::csv_rollup::CsvRow;
use crate::wal::HistorySink;
use crate::{HistoryRecord, Result};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::Path;

/// In-memory, append-only history. Records cannot be edited or removed.
#[derive(Clone, Debug, Default)]
pub struct SessionHistory {
    records: Vec<HistoryRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Up to `limit` records, newest first
    pub fn recent(&self, limit: usize) -> Vec<&HistoryRecord> {
        let mut sorted: Vec<&HistoryRecord> = self.records.iter().collect();
        // Stable sort keeps insertion order reversed for equal timestamps
        sorted.reverse();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(limit);
        sorted
    }

    /// All records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }
}

impl HistorySink for SessionHistory {
    fn append(&mut self, record: &HistoryRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Load the newest `limit` records from the log and the CSV archive
///
/// Returns records sorted by `created_at`, newest first. Records that appear
/// in both the log and the archive are returned once.
pub fn load_recent_records(
    log_path: &Path,
    csv_path: &Path,
    limit: usize,
) -> Result<Vec<HistoryRecord>> {
    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();

    if log_path.exists() {
        for record in crate::wal::read_records(log_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
            }
        }
        tracing::debug!("Loaded {} records from history log", records.len());
    }

    if csv_path.exists() {
        let mut csv_count = 0;
        for record in load_records_from_csv(csv_path)? {
            if seen_ids.insert(record.id) {
                records.push(record);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} records from CSV", csv_count);
    }

    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.truncate(limit);

    tracing::info!("Loaded {} most recent records", records.len());

    Ok(records)
}

fn load_records_from_csv(path: &Path) -> Result<Vec<HistoryRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match HistoryRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wal::tests::create_test_record;
    use crate::wal::JsonlSink;
    use chrono::{Duration, Utc};

    #[test]
    fn test_session_history_newest_first() {
        let now = Utc::now();
        let mut history = SessionHistory::new();
        history.append(&create_test_record(70.0, now - Duration::minutes(10))).unwrap();
        history.append(&create_test_record(71.0, now)).unwrap();
        history.append(&create_test_record(72.0, now - Duration::minutes(5))).unwrap();

        let recent = history.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].weight_kg, 71.0);
        assert_eq!(recent[1].weight_kg, 72.0);
        assert_eq!(history.len(), 3);
        assert!(!history.is_empty());
        // Insertion order is preserved underneath
        let weights: Vec<f64> = history.iter().map(|r| r.weight_kg).collect();
        assert_eq!(weights, vec![70.0, 71.0, 72.0]);
    }

    #[test]
    fn test_session_history_ties_prefer_latest_append() {
        let now = Utc::now();
        let mut history = SessionHistory::new();
        history.append(&create_test_record(70.0, now)).unwrap();
        history.append(&create_test_record(71.0, now)).unwrap();

        assert_eq!(history.recent(1)[0].weight_kg, 71.0);
    }

    #[test]
    fn test_load_recent_from_log_limited() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("history.jsonl");
        let csv_path = temp_dir.path().join("history.csv");

        let now = Utc::now();
        let mut sink = JsonlSink::new(&log_path);
        for i in 0..5 {
            sink.append(&create_test_record(60.0 + f64::from(i), now - Duration::hours(5 - i64::from(i))))
                .unwrap();
        }

        let records = load_recent_records(&log_path, &csv_path, 3).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].weight_kg, 64.0);
        assert_eq!(records[2].weight_kg, 62.0);
    }

    #[test]
    fn test_merges_archive_and_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("history.jsonl");
        let csv_path = temp_dir.path().join("history.csv");

        let now = Utc::now();
        let mut sink = JsonlSink::new(&log_path);
        sink.append(&create_test_record(80.0, now - Duration::days(2))).unwrap();
        crate::csv_rollup::log_to_csv_and_archive(&log_path, &csv_path).unwrap();

        let mut sink = JsonlSink::new(&log_path);
        sink.append(&create_test_record(79.0, now)).unwrap();

        let records = load_recent_records(&log_path, &csv_path, 10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].weight_kg, 79.0);
        assert_eq!(records[1].weight_kg, 80.0);
    }

    #[test]
    fn test_deduplication_across_log_and_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("history.jsonl");
        let csv_path = temp_dir.path().join("history.csv");

        let record = create_test_record(75.0, Utc::now());
        let mut sink = JsonlSink::new(&log_path);
        sink.append(&record).unwrap();
        crate::csv_rollup::log_to_csv_and_archive(&log_path, &csv_path).unwrap();

        // Same record lands in the live log again
        let mut sink = JsonlSink::new(&log_path);
        sink.append(&record).unwrap();

        let records = load_recent_records(&log_path, &csv_path, 10).unwrap();
        assert_eq!(records.iter().filter(|r| r.id == record.id).count(), 1);
    }

    #[test]
    fn test_no_files_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = load_recent_records(
            &temp_dir.path().join("missing.jsonl"),
            &temp_dir.path().join("missing.csv"),
            10,
        )
        .unwrap();
        assert!(records.is_empty());
    }
}

//! CSV rollup for archiving the history log.
//!
//! The live JSONL log is periodically folded into a CSV archive. The CSV is
//! synced before the log is renamed so a crash never loses records.

use crate::{BmiCategory, Error, HistoryRecord, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;
use uuid::Uuid;

/// Extension given to a log once its records are in the CSV archive
pub const PROCESSED_EXTENSION: &str = "jsonl.processed";

/// A row in the CSV archive
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CsvRow {
    id: String,
    weight: f64,
    height: f64,
    age: u32,
    gender: String,
    activity_level: String,
    bmi: f64,
    category: String,
    bmr: f64,
    daily_calories: i32,
    created_at: String,
}

impl From<&HistoryRecord> for CsvRow {
    fn from(record: &HistoryRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            weight: record.weight_kg,
            height: record.height_cm,
            age: record.age_years,
            gender: record.gender.to_string(),
            activity_level: record.activity_level.to_string(),
            bmi: record.bmi,
            category: record.category.to_string(),
            bmr: record.bmr,
            daily_calories: record.daily_calories,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<CsvRow> for HistoryRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Other(format!("Invalid UUID: {}", e)))?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| Error::Other(format!("Invalid date: {}", e)))?
            .with_timezone(&Utc);

        Ok(HistoryRecord {
            id,
            created_at,
            weight_kg: row.weight,
            height_cm: row.height,
            age_years: row.age,
            gender: row.gender.parse()?,
            activity_level: row.activity_level.parse()?,
            bmi: row.bmi,
            // Category is a pure function of bmi
            category: BmiCategory::from_bmi(row.bmi),
            bmr: row.bmr,
            daily_calories: row.daily_calories,
        })
    }
}

/// Roll up the history log into CSV and archive the log
///
/// This function:
/// 1. Reads all records from the log
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the log to `.jsonl.processed`
/// 5. Returns the number of records processed
///
/// Holds the log's exclusive lock throughout, so concurrent appends land
/// either before the read or in a fresh log after the rename.
pub fn log_to_csv_and_archive(log_path: &Path, csv_path: &Path) -> Result<usize> {
    if !log_path.exists() {
        return Ok(0);
    }

    let lock = crate::wal::open_lock_file(log_path)?;
    lock.lock_exclusive()?;
    let result = archive_locked(log_path, csv_path);
    lock.unlock()?;
    result
}

fn archive_locked(log_path: &Path, csv_path: &Path) -> Result<usize> {
    let records = crate::wal::read_records_unlocked(log_path)?;

    if records.is_empty() {
        tracing::info!("No records in history log to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for record in &records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} records to CSV", records.len());

    let processed_path = log_path.with_extension(PROCESSED_EXTENSION);
    std::fs::rename(log_path, &processed_path)?;

    tracing::info!("Archived history log to {:?}", processed_path);

    Ok(records.len())
}

/// Remove all processed logs in the given directory
pub fn cleanup_processed_logs(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed log: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed history logs", count);
    }

    Ok(count)
}

//! Append-only history log.
//!
//! History records are appended to a JSONL (JSON Lines) file. Appends,
//! reads and rollups coordinate through a sidecar `.lock` file so that a
//! rollup renaming the log can never race with an append into it.

use crate::{HistoryRecord, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for saved calculations. Records are only ever appended.
pub trait HistorySink {
    fn append(&mut self, record: &HistoryRecord) -> Result<()>;
}

/// JSONL-based history sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistorySink for JsonlSink {
    fn append(&mut self, record: &HistoryRecord) -> Result<()> {
        let lock = open_lock_file(&self.path)?;
        lock.lock_exclusive()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        lock.unlock()?;

        tracing::debug!("Appended record {} to history log", record.id);
        Ok(())
    }
}

/// Open (creating if needed) the lock file guarding `log_path`
pub(crate) fn open_lock_file(log_path: &Path) -> Result<File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(log_path.with_extension("lock"))?;
    Ok(file)
}

/// Read all records from a history log, oldest first
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_records(path: &Path) -> Result<Vec<HistoryRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let lock = open_lock_file(path)?;
    lock.lock_shared()?;
    let records = read_records_unlocked(path);
    lock.unlock()?;
    records
}

/// Read records without taking the lock; the caller must hold it
pub(crate) fn read_records_unlocked(path: &Path) -> Result<Vec<HistoryRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<HistoryRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    tracing::debug!("Read {} records from history log", records.len());
    Ok(records)
}

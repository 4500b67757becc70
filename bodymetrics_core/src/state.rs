//! Saved profile persistence with file locking.
//!
//! The last profile a user calculated with is remembered so later runs can
//! omit unchanged biometrics.

use crate::{Error, Profile, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The most recently used profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedProfile {
    pub profile: Profile,
    pub saved_at: DateTime<Utc>,
}

impl SavedProfile {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            saved_at: Utc::now(),
        }
    }

    /// Load the saved profile with shared locking
    ///
    /// Returns `None` if the file doesn't exist. A corrupted or unreadable
    /// file logs a warning and also yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No saved profile at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open saved profile {:?}: {}. Ignoring.", path, e);
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock saved profile {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read saved profile {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<SavedProfile>(&contents) {
            Ok(saved) => {
                tracing::debug!("Loaded saved profile from {:?}", path);
                Ok(Some(saved))
            }
            Err(e) => {
                tracing::warn!("Failed to parse saved profile {:?}: {}. Ignoring.", path, e);
                Ok(None)
            }
        }
    }

    /// Save atomically: write a temp file, sync, rename over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("{:?} has no parent directory", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved profile to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Gender};

    fn sample() -> SavedProfile {
        SavedProfile::new(Profile {
            weight_kg: 64.5,
            height_cm: 168.0,
            age_years: 41,
            gender: Gender::Female,
            activity_level: ActivityLevel::VeryActive,
        })
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        let saved = sample();
        saved.save(&path).unwrap();

        let loaded = SavedProfile::load(&path).unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(SavedProfile::load(&temp_dir.path().join("nope.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_corrupted_profile_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        assert!(SavedProfile::load(&path).unwrap().is_none());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.json");

        sample().save(&path).unwrap();
        sample().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "profile.json")
            .collect();
        assert!(extras.is_empty(), "found extras: {:?}", extras);
    }
}

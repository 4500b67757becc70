#![forbid(unsafe_code)]

//! Core domain model and business logic for body metrics.
//!
//! This crate provides:
//! - Domain types (profile, metrics, BMI categories, history records)
//! - The metrics engine (BMI, BMR, calories, body fat, hydration, protein)
//! - Input range limits and unit conversion
//! - Persistence (history log, CSV archive, saved profile)

pub mod types;
pub mod error;
pub mod engine;
pub mod limits;
pub mod advice;
pub mod config;
pub mod logging;
pub mod wal;
pub mod csv_rollup;
pub mod history;
pub mod state;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use engine::compute;
pub use limits::{ProfileLimits, RangePolicy};
pub use config::Config;
pub use wal::{HistorySink, JsonlSink};
pub use history::{load_recent_records, SessionHistory};
pub use state::SavedProfile;

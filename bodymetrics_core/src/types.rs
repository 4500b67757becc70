//! Core domain types for body metrics.
//!
//! This module defines the fundamental types used throughout the system:
//! - Biometric inputs (gender, activity level, unit system, profile)
//! - Derived metrics and BMI classification
//! - History records

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Input Enumerations
// ============================================================================

/// Gender used to select the BMR and body fat formulas
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            _ => Err(Error::InvalidInput(format!("unknown gender '{}'", s))),
        }
    }
}

/// Self-reported activity level, scaling BMR to daily energy expenditure
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Light",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtraActive => "Extra Active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            _ => Err(Error::UnknownActivityLevel(s.to_string())),
        }
    }
}

/// Unit system the raw measurements were entered in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Kilograms and centimetres
    #[default]
    Metric,
    /// Pounds and inches
    Imperial,
}

impl UnitSystem {
    pub const KG_PER_LB: f64 = 0.453592;
    pub const CM_PER_INCH: f64 = 2.54;

    pub fn weight_to_kg(&self, weight: f64) -> f64 {
        match self {
            UnitSystem::Metric => weight,
            UnitSystem::Imperial => weight * Self::KG_PER_LB,
        }
    }

    pub fn height_to_cm(&self, height: f64) -> f64 {
        match self {
            UnitSystem::Metric => height,
            UnitSystem::Imperial => height * Self::CM_PER_INCH,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "metric" | "si" => Ok(UnitSystem::Metric),
            "imperial" | "us" => Ok(UnitSystem::Imperial),
            _ => Err(Error::InvalidInput(format!("unknown unit system '{}'", s))),
        }
    }
}

/// Lowercase and fold spaces/hyphens into underscores ("Very Active" -> "very_active")
fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ============================================================================
// Profile Types
// ============================================================================

/// Validated, metric biometrics for a single calculation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

/// Raw measurements as entered, tagged with their unit system
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measurements {
    pub weight: f64,
    pub height: f64,
    pub units: UnitSystem,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

impl Measurements {
    /// Convert to a metric `Profile`, rejecting non-positive or non-finite values
    pub fn into_profile(self) -> Result<Profile> {
        let profile = Profile {
            weight_kg: self.units.weight_to_kg(self.weight),
            height_cm: self.units.height_to_cm(self.height),
            age_years: self.age_years,
            gender: self.gender,
            activity_level: self.activity_level,
        };
        crate::engine::validate(&profile)?;
        Ok(profile)
    }
}

// ============================================================================
// Derived Metrics
// ============================================================================

/// BMI classification band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify a BMI value using contiguous half-open bands.
    ///
    /// `[18.5, 25)` is Normal, so 25.0 is Overweight and values in
    /// `(24.9, 25.0)` are still Normal.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn health_risk(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Higher risk of nutritional deficiency, osteoporosis",
            BmiCategory::Normal => "Low risk, maintain healthy lifestyle",
            BmiCategory::Overweight => "Increased risk of heart disease, diabetes",
            BmiCategory::Obese => "High risk of heart disease, diabetes, other health issues",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Healthy weight band for a given height (BMI 18.5 to 24.9)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct IdealWeightRange {
    pub min_kg: f64,
    pub max_kg: f64,
}

/// Complete set of metrics derived from a `Profile`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricsResult {
    pub bmi: f64,
    pub category: BmiCategory,
    pub health_risk_note: String,
    pub ideal_weight_range: IdealWeightRange,
    pub bmr: f64,
    pub daily_calories: i32,
    pub body_fat_pct: f64,
    pub water_intake_ml: u32,
    pub protein_g: u32,
}

// ============================================================================
// History Types
// ============================================================================

/// A saved calculation. Created once, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub bmi: f64,
    pub category: BmiCategory,
    pub bmr: f64,
    pub daily_calories: i32,
}

impl HistoryRecord {
    pub fn new(profile: &Profile, metrics: &MetricsResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            weight_kg: profile.weight_kg,
            height_cm: profile.height_cm,
            age_years: profile.age_years,
            gender: profile.gender,
            activity_level: profile.activity_level,
            bmi: metrics.bmi,
            category: metrics.category,
            bmr: metrics.bmr,
            daily_calories: metrics.daily_calories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_parsing_variants() {
        assert_eq!("Very Active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("extra-active".parse::<ActivityLevel>().unwrap(), ActivityLevel::ExtraActive);
        assert_eq!(" SEDENTARY ".parse::<ActivityLevel>().unwrap(), ActivityLevel::Sedentary);
    }

    #[test]
    fn test_unknown_activity_level_rejected() {
        let err = "couch".parse::<ActivityLevel>().unwrap_err();
        assert!(matches!(err, Error::UnknownActivityLevel(ref s) if s == "couch"));
    }

    #[test]
    fn test_unknown_gender_is_invalid_input() {
        let err = "robot".parse::<Gender>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_multipliers() {
        let expected = [1.2, 1.375, 1.55, 1.725, 1.9];
        for (level, m) in ActivityLevel::ALL.iter().zip(expected) {
            assert_eq!(level.multiplier(), m);
        }
    }

    #[test]
    fn test_category_bands_are_contiguous() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.95), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_imperial_conversion() {
        let profile = Measurements {
            weight: 154.0,
            height: 67.0,
            units: UnitSystem::Imperial,
            age_years: 40,
            gender: Gender::Female,
            activity_level: ActivityLevel::Light,
        }
        .into_profile()
        .unwrap();

        assert!((profile.weight_kg - 154.0 * 0.453592).abs() < 1e-9);
        assert!((profile.height_cm - 170.18).abs() < 1e-9);
    }

    #[test]
    fn test_measurements_reject_zero_height() {
        let result = Measurements {
            weight: 70.0,
            height: 0.0,
            units: UnitSystem::Metric,
            age_years: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
        }
        .into_profile();

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_enum_serde_names() {
        let json = serde_json::to_string(&ActivityLevel::VeryActive).unwrap();
        assert_eq!(json, "\"very_active\"");
        let cat: BmiCategory = serde_json::from_str("\"overweight\"").unwrap();
        assert_eq!(cat, BmiCategory::Overweight);
    }
}

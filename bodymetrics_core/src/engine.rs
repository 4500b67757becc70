//! Metrics engine: derives every body metric from a `Profile`.
//!
//! The calculation runs in a fixed order:
//! - BMI and its category from weight and height
//! - Ideal weight band for the height
//! - BMR (Harris-Benedict) and daily calories from the activity multiplier
//! - Body fat estimate from BMI and age
//! - Water and protein targets from weight
//!
//! `compute` is pure: no I/O, no logging, no shared state.

use crate::{
    BmiCategory, Error, Gender, IdealWeightRange, MetricsResult, Profile, Result,
};

const IDEAL_BMI_MIN: f64 = 18.5;
const IDEAL_BMI_MAX: f64 = 24.9;
const BODY_FAT_MIN: f64 = 0.0;
const BODY_FAT_MAX: f64 = 60.0;
const WATER_ML_PER_KG: f64 = 35.0;
const PROTEIN_G_PER_KG: f64 = 0.8;

/// Compute the full metrics set for a profile
///
/// Fails with `Error::InvalidInput` when height, weight or age is not
/// positive (or a real value is not finite). Positive values outside the
/// recommended ranges are computed as-is.
pub fn compute(profile: &Profile) -> Result<MetricsResult> {
    validate(profile)?;

    let height_m = profile.height_cm / 100.0;
    let height_m_sq = height_m.powi(2);

    let bmi = round_to(profile.weight_kg / height_m_sq, 1);
    let category = BmiCategory::from_bmi(bmi);

    let ideal_weight_range = IdealWeightRange {
        min_kg: round_to(IDEAL_BMI_MIN * height_m_sq, 1),
        max_kg: round_to(IDEAL_BMI_MAX * height_m_sq, 1),
    };

    let bmr = harris_benedict(profile);
    let daily_calories = (bmr * profile.activity_level.multiplier()).round_ties_even() as i32;

    Ok(MetricsResult {
        bmi,
        category,
        health_risk_note: category.health_risk().to_string(),
        ideal_weight_range,
        bmr,
        daily_calories,
        body_fat_pct: body_fat_pct(bmi, profile.age_years, profile.gender),
        water_intake_ml: (profile.weight_kg * WATER_ML_PER_KG).round_ties_even() as u32,
        protein_g: (profile.weight_kg * PROTEIN_G_PER_KG).round_ties_even() as u32,
    })
}

/// Reject non-positive or non-finite biometrics
pub fn validate(profile: &Profile) -> Result<()> {
    if !profile.height_cm.is_finite() || profile.height_cm <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "height must be positive, got {} cm",
            profile.height_cm
        )));
    }
    if !profile.weight_kg.is_finite() || profile.weight_kg <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "weight must be positive, got {} kg",
            profile.weight_kg
        )));
    }
    if profile.age_years == 0 {
        return Err(Error::InvalidInput("age must be positive".into()));
    }
    Ok(())
}

/// Basal metabolic rate in kcal/day (Harris-Benedict, revised)
///
/// `Other` takes the arithmetic mean of the male and female equations.
pub fn harris_benedict(profile: &Profile) -> f64 {
    let w = profile.weight_kg;
    let h = profile.height_cm;
    let a = f64::from(profile.age_years);

    let male = 88.362 + 13.397 * w + 4.799 * h - 5.677 * a;
    let female = 447.593 + 9.247 * w + 3.098 * h - 4.330 * a;

    match profile.gender {
        Gender::Male => male,
        Gender::Female => female,
        Gender::Other => (male + female) / 2.0,
    }
}

/// Linear body fat estimate, clamped to [0, 60] and rounded to 1 decimal
pub fn body_fat_pct(bmi: f64, age_years: u32, gender: Gender) -> f64 {
    let offset = match gender {
        Gender::Male => 16.2,
        Gender::Female | Gender::Other => 5.4,
    };
    let raw = 1.20 * bmi + 0.23 * f64::from(age_years) - offset;
    round_to(raw.clamp(BODY_FAT_MIN, BODY_FAT_MAX), 1)
}

/// Round to `decimals` places using the exact binary value
///
/// Scaling by a power of ten first can turn 8.9499999... into 8.95 and round
/// it the wrong way. Decimal formatting rounds the exact value, with exact
/// ties going to even.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

//! Static health tips and result-derived suggestions.

use crate::MetricsResult;
use once_cell::sync::Lazy;

/// General tips, independent of the result
static GENERAL_TIPS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Maintain a balanced diet with proper calories",
        "Stay hydrated with at least 30-40 ml/kg water",
        "Do 150 min/week of moderate exercise",
        "Monitor BMI and body fat regularly",
        "Get 7-9 hours of sleep per night",
        "Manage stress through mindfulness",
    ]
});

pub fn general_tips() -> &'static [&'static str] {
    &GENERAL_TIPS
}

/// Suggestions personalised with the result's targets
pub fn suggestions(metrics: &MetricsResult) -> Vec<String> {
    vec![
        format!(
            "Maintain weight within {:.1}-{:.1} kg",
            metrics.ideal_weight_range.min_kg, metrics.ideal_weight_range.max_kg
        ),
        format!("Drink at least {} ml water daily", metrics.water_intake_ml),
        format!("Consume {} g protein daily", metrics.protein_g),
        "Do 150 min/week moderate exercise".into(),
        "Sleep 7-9 hours nightly".into(),
        "Regular health check-ups recommended".into(),
    ]
}

/// One-line summary suitable for copying or sharing
pub fn share_summary(metrics: &MetricsResult) -> String {
    format!(
        "BMI: {:.1} ({}) | BMR: {} kcal | Calories: {} kcal | Water: {} ml | Protein: {} g",
        metrics.bmi,
        metrics.category,
        metrics.bmr.round() as i64,
        metrics.daily_calories,
        metrics.water_intake_ml,
        metrics.protein_g
    )
}

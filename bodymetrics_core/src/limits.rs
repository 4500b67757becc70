//! Recommended input ranges and how to enforce them.
//!
//! The engine computes any positive profile. Callers that take raw user
//! input apply `ProfileLimits` first, either clamping into range or
//! rejecting the profile.

use crate::{Error, Profile, Result};
use serde::{Deserialize, Serialize};

/// What to do with a value outside its recommended range
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    #[default]
    Clamp,
    Reject,
}

/// Inclusive [min, max] bounds per biometric field
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProfileLimits {
    #[serde(default = "default_weight_kg")]
    pub weight_kg: (f64, f64),

    #[serde(default = "default_height_cm")]
    pub height_cm: (f64, f64),

    #[serde(default = "default_age_years")]
    pub age_years: (u32, u32),

    #[serde(default)]
    pub policy: RangePolicy,
}

impl Default for ProfileLimits {
    fn default() -> Self {
        Self {
            weight_kg: default_weight_kg(),
            height_cm: default_height_cm(),
            age_years: default_age_years(),
            policy: RangePolicy::default(),
        }
    }
}

fn default_weight_kg() -> (f64, f64) {
    (20.0, 200.0)
}

fn default_height_cm() -> (f64, f64) {
    (100.0, 250.0)
}

fn default_age_years() -> (u32, u32) {
    (5, 100)
}

impl ProfileLimits {
    /// Ensure the bounds themselves are usable
    pub fn validate(&self) -> Result<()> {
        let (wmin, wmax) = self.weight_kg;
        let (hmin, hmax) = self.height_cm;
        let (amin, amax) = self.age_years;

        if !(wmin > 0.0 && wmin <= wmax && wmax.is_finite()) {
            return Err(Error::Config(format!("invalid weight range {:?}", self.weight_kg)));
        }
        if !(hmin > 0.0 && hmin <= hmax && hmax.is_finite()) {
            return Err(Error::Config(format!("invalid height range {:?}", self.height_cm)));
        }
        if amin == 0 || amin > amax {
            return Err(Error::Config(format!("invalid age range {:?}", self.age_years)));
        }
        Ok(())
    }

    /// Reject a profile with any field outside its range
    pub fn check(&self, profile: &Profile) -> Result<()> {
        let (wmin, wmax) = self.weight_kg;
        if !(wmin..=wmax).contains(&profile.weight_kg) {
            return Err(Error::InvalidInput(format!(
                "weight {:.1} kg outside {}-{} kg",
                profile.weight_kg, wmin, wmax
            )));
        }

        let (hmin, hmax) = self.height_cm;
        if !(hmin..=hmax).contains(&profile.height_cm) {
            return Err(Error::InvalidInput(format!(
                "height {:.1} cm outside {}-{} cm",
                profile.height_cm, hmin, hmax
            )));
        }

        let (amin, amax) = self.age_years;
        if !(amin..=amax).contains(&profile.age_years) {
            return Err(Error::InvalidInput(format!(
                "age {} outside {}-{} years",
                profile.age_years, amin, amax
            )));
        }

        Ok(())
    }

    /// Clamp every field into range
    ///
    /// Never panics, even on bounds that fail `validate`; the lower bound
    /// wins when a range is inverted.
    pub fn clamp(&self, profile: Profile) -> Profile {
        Profile {
            weight_kg: profile.weight_kg.min(self.weight_kg.1).max(self.weight_kg.0),
            height_cm: profile.height_cm.min(self.height_cm.1).max(self.height_cm.0),
            age_years: profile.age_years.min(self.age_years.1).max(self.age_years.0),
            ..profile
        }
    }

    /// Apply the configured policy
    ///
    /// Fails with `Error::Config` if the bounds themselves are invalid.
    pub fn apply(&self, profile: Profile) -> Result<Profile> {
        self.validate()?;
        match self.policy {
            RangePolicy::Clamp => {
                let clamped = self.clamp(profile.clone());
                if clamped != profile {
                    tracing::debug!("Clamped profile {:?} to {:?}", profile, clamped);
                }
                Ok(clamped)
            }
            RangePolicy::Reject => {
                self.check(&profile)?;
                Ok(profile)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityLevel, Gender};

    fn profile(weight_kg: f64, height_cm: f64, age_years: u32) -> Profile {
        Profile {
            weight_kg,
            height_cm,
            age_years,
            gender: Gender::Female,
            activity_level: ActivityLevel::Light,
        }
    }

    #[test]
    fn test_in_range_profile_passes() {
        let limits = ProfileLimits::default();
        assert!(limits.check(&profile(70.0, 170.0, 25)).is_ok());
        assert!(limits.check(&profile(20.0, 250.0, 100)).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let limits = ProfileLimits::default();
        assert!(matches!(
            limits.check(&profile(250.0, 170.0, 25)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            limits.check(&profile(70.0, 90.0, 25)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            limits.check(&profile(70.0, 170.0, 2)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_clamp_pulls_fields_into_range() {
        let limits = ProfileLimits::default();
        let clamped = limits.clamp(profile(300.0, 80.0, 120));
        assert_eq!(clamped.weight_kg, 200.0);
        assert_eq!(clamped.height_cm, 100.0);
        assert_eq!(clamped.age_years, 100);
        assert_eq!(clamped.gender, Gender::Female);
    }

    #[test]
    fn test_apply_follows_policy() {
        let mut limits = ProfileLimits::default();
        let p = profile(15.0, 170.0, 30);

        assert_eq!(limits.apply(p.clone()).unwrap().weight_kg, 20.0);

        limits.policy = RangePolicy::Reject;
        assert!(limits.apply(p).is_err());
    }

    #[test]
    fn test_inverted_bounds_invalid() {
        let limits = ProfileLimits {
            height_cm: (250.0, 100.0),
            ..ProfileLimits::default()
        };
        assert!(matches!(limits.validate(), Err(Error::Config(_))));
        assert!(ProfileLimits::default().validate().is_ok());
    }

    #[test]
    fn test_apply_with_bad_bounds_is_config_error() {
        let p = profile(70.0, 170.0, 25);

        let inverted: ProfileLimits = toml::from_str("age_years = [90, 10]").unwrap();
        assert!(matches!(inverted.apply(p.clone()), Err(Error::Config(_))));

        let nan_bound = ProfileLimits {
            weight_kg: (f64::NAN, 200.0),
            ..ProfileLimits::default()
        };
        assert!(matches!(nan_bound.apply(p.clone()), Err(Error::Config(_))));

        let unbounded = ProfileLimits {
            height_cm: (100.0, f64::INFINITY),
            ..ProfileLimits::default()
        };
        assert!(matches!(unbounded.apply(p), Err(Error::Config(_))));
    }

    #[test]
    fn test_clamp_with_bad_bounds_does_not_panic() {
        let limits = ProfileLimits {
            weight_kg: (200.0, 20.0),
            height_cm: (f64::NAN, f64::NAN),
            age_years: (90, 10),
            policy: RangePolicy::Clamp,
        };
        let clamped = limits.clamp(profile(70.0, 170.0, 25));
        assert_eq!(clamped.weight_kg, 200.0);
        assert_eq!(clamped.height_cm, 170.0);
        assert_eq!(clamped.age_years, 90);
    }
}

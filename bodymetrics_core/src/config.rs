//! Configuration file support for bodymetrics.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/bodymetrics/config.toml`.

use crate::{ActivityLevel, Error, ProfileLimits, Result, UnitSystem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub limits: ProfileLimits,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Input defaults used when a flag is omitted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub units: UnitSystem,

    #[serde(default = "default_activity_level")]
    pub activity_level: ActivityLevel,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::default(),
            activity_level: default_activity_level(),
        }
    }
}

/// History listing configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("bodymetrics")
}

fn default_activity_level() -> ActivityLevel {
    ActivityLevel::Moderate
}

fn default_recent_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.limits.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("bodymetrics").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RangePolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.defaults.units, UnitSystem::Metric);
        assert_eq!(config.defaults.activity_level, ActivityLevel::Moderate);
        assert_eq!(config.limits.policy, RangePolicy::Clamp);
        assert_eq!(config.history.recent_limit, 10);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.limits.policy = RangePolicy::Reject;
        config.defaults.units = UnitSystem::Imperial;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.limits, config.limits);
        assert_eq!(loaded.defaults.units, UnitSystem::Imperial);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[defaults]
activity_level = "very_active"

[limits]
policy = "reject"
age_years = [18, 90]
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.defaults.activity_level, ActivityLevel::VeryActive);
        assert_eq!(config.defaults.units, UnitSystem::Metric); // default
        assert_eq!(config.limits.policy, RangePolicy::Reject);
        assert_eq!(config.limits.age_years, (18, 90));
        assert_eq!(config.limits.weight_kg, (20.0, 200.0)); // default
    }

    #[test]
    fn test_invalid_limits_rejected_on_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nweight_kg = [200.0, 20.0]\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}

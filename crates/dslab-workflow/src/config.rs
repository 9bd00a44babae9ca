//! Simulation configuration.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::trace::IngestionConfig;
use crate::unit::UnitConfig;

/// YAML-serializable config. Missing and zero values fall back to the defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub rating: u64,
    #[serde(default)]
    pub max_invocations_per_minute: u64,
    #[serde(default)]
    pub max_records: usize,
    #[serde(default)]
    pub placement: String,
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

/// This is simulation config. It implements Default trait so that you can create
/// default config and change only the fields you need.
#[derive(Clone, Debug)]
pub struct Config {
    /// Length units per time unit of task runtime.
    pub rating: u64,
    pub max_invocations_per_minute: u64,
    pub max_records: usize,
    /// Name of the placement policy, see [`default_placement_resolver`](crate::placement::default_placement_resolver).
    pub placement: String,
    pub units: Vec<UnitConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rating: 1000,
            max_invocations_per_minute: 1000,
            max_records: 1000,
            placement: "LeastLoaded".to_string(),
            units: vec![UnitConfig::new("vm", 1000, 1, 1024).with_count(5)],
        }
    }
}

impl Config {
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut me: Self = Default::default();
        if raw.rating != 0 {
            me.rating = raw.rating;
        }
        if raw.max_invocations_per_minute != 0 {
            me.max_invocations_per_minute = raw.max_invocations_per_minute;
        }
        if raw.max_records != 0 {
            me.max_records = raw.max_records;
        }
        if !raw.placement.is_empty() {
            me.placement = raw.placement;
        }
        if !raw.units.is_empty() {
            for unit in raw.units.iter() {
                if unit.speed == 0 {
                    return Err(ConfigError::Invalid(format!("unit {} has zero speed", unit.name)));
                }
                if unit.cores == 0 {
                    return Err(ConfigError::Invalid(format!("unit {} has zero cores", unit.name)));
                }
            }
            me.units = raw.units;
        }
        Ok(me)
    }

    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let f = File::open(path)?;
        Self::from_raw(serde_yaml::from_reader(f)?)
    }

    pub fn ingestion(&self) -> IngestionConfig {
        IngestionConfig {
            rating: self.rating,
            max_invocations_per_minute: self.max_invocations_per_minute,
            max_records: self.max_records,
        }
    }

    /// Returns the number of units in the pool built from this config.
    pub fn unit_count(&self) -> usize {
        self.units.iter().map(|unit| unit.count as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_keeps_defaults() {
        let raw: RawConfig = serde_yaml::from_str("placement: RoundRobin\n").unwrap();
        let config = Config::from_raw(raw).unwrap();
        assert_eq!(config.rating, 1000);
        assert_eq!(config.placement, "RoundRobin");
        assert_eq!(config.unit_count(), 5);
        assert_eq!(config.ingestion().max_records, 1000);
    }

    #[test]
    fn test_from_raw_units() {
        let raw: RawConfig = serde_yaml::from_str(
            "rating: 500\nunits:\n  - name: big\n    speed: 2000\n    cores: 4\n    count: 2\n  - name: small\n    speed: 500\n",
        )
        .unwrap();
        let config = Config::from_raw(raw).unwrap();
        assert_eq!(config.rating, 500);
        assert_eq!(config.unit_count(), 3);
        assert_eq!(config.units[1].cores, 1);
    }

    #[test]
    fn test_zero_speed_is_invalid() {
        let raw: RawConfig = serde_yaml::from_str("units:\n  - name: broken\n    speed: 0\n").unwrap();
        assert!(matches!(Config::from_raw(raw), Err(ConfigError::Invalid(_))));
    }
}

//! Cloud layer configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::colour::FloatRgba;
use crate::terrain::{ConfigError, MAX_SUBDIVISIONS};

/// Parameters for the cloud layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub enabled: bool,
    pub seed: u64,
    /// Subdivision levels for the cloud shell; `None` follows the terrain.
    pub subdivisions: Option<u32>,
    /// Height above the terrain base, in percent of the unit radius.
    pub height: f32,
    pub colour: FloatRgba,
    pub noise_terms: u8,
    pub noise_decay: f32,
    pub noise_frequency: f32,
    /// Noise value (after mapping to `[0, 1]`) at which cloud starts to show.
    pub threshold_min: f32,
    /// Noise value at which cloud is fully opaque.
    pub threshold_max: f32,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            seed: 0,
            subdivisions: None,
            height: 10.0,
            colour: FloatRgba::rgb(1.0, 1.0, 1.0),
            noise_terms: 6,
            noise_decay: 0.5,
            noise_frequency: 4.0,
            threshold_min: 0.5,
            threshold_max: 0.6,
        }
    }
}

impl CloudConfig {
    /// Enabled cloud layer with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            enabled: true,
            seed,
            ..Default::default()
        }
    }

    /// Loads a JSON config. Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Subdivision levels to use alongside terrain subdivided `terrain` times.
    pub fn effective_subdivisions(&self, terrain: u32) -> u32 {
        self.subdivisions.unwrap_or(terrain)
    }

    /// Distance of the cloud shell above the unit reference surface.
    pub fn elevation(&self) -> f32 {
        self.height / 100.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold_max <= self.threshold_min {
            return Err(ConfigError::Invalid {
                field: "threshold_max",
                reason: format!(
                    "must exceed threshold_min ({} <= {})",
                    self.threshold_max, self.threshold_min
                ),
            });
        }
        if let Some(s) = self.subdivisions {
            if s > MAX_SUBDIVISIONS {
                return Err(ConfigError::Invalid {
                    field: "subdivisions",
                    reason: format!("{} exceeds the maximum of {}", s, MAX_SUBDIVISIONS),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CloudConfig::default();

        assert!(!config.enabled);
        assert_eq!(config.height, 10.0);
        assert_eq!(config.noise_terms, 6);
        assert_eq!(config.noise_frequency, 4.0);
        assert_eq!(config.effective_subdivisions(7), 7);
        assert!((config.elevation() - 0.1).abs() < 1e-6);
        config.validate().unwrap();
    }

    #[test]
    fn test_own_subdivisions() {
        let config = CloudConfig {
            subdivisions: Some(3),
            ..CloudConfig::with_seed(1)
        };
        assert_eq!(config.effective_subdivisions(7), 3);
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        let config = CloudConfig {
            threshold_min: 0.6,
            threshold_max: 0.6,
            ..CloudConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "threshold_max", .. })
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_optional_subdivisions() {
        let config: CloudConfig = serde_json::from_str(r#"{"enabled":true,"subdivisions":4}"#).unwrap();
        assert_eq!(config.subdivisions, Some(4));
        assert_eq!(config.threshold_max, 0.6);
    }
}

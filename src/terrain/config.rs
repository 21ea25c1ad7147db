//! Terrain configuration.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::colour::FloatRgba;
use crate::mesh::FlatShape;
use crate::noise::fold_seed;

/// Highest subdivision level accepted by `validate`.
pub const MAX_SUBDIVISIONS: u32 = 10;

/// Errors raised while loading or checking configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// The base shape that terrain is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    #[default]
    Planet,
    FlatHexagon,
    FlatSquare,
    FlatTriangle,
}

impl ObjectType {
    /// Polygon outline for flat terrain, `None` for planets.
    pub fn flat_shape(self) -> Option<FlatShape> {
        match self {
            ObjectType::Planet => None,
            ObjectType::FlatHexagon => Some(FlatShape::Hexagon),
            ObjectType::FlatSquare => Some(FlatShape::Square),
            ObjectType::FlatTriangle => Some(FlatShape::Triangle),
        }
    }
}

/// Where snow settles, in units of normalised height.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowlineConfig {
    /// Snowline at the equator.
    pub equator: f32,
    /// Snowline at the poles.
    pub pole: f32,
    /// Exponent applied to positive snowlines.
    pub power_law: f32,
    /// How much steep slopes raise the snowline.
    pub slope_effect: f32,
    /// How much rivers lower the snowline.
    pub glacier_effect: f32,
}

impl Default for SnowlineConfig {
    fn default() -> Self {
        Self {
            equator: 0.8,
            pole: -0.1,
            power_law: 1.0,
            slope_effect: 1.0,
            glacier_effect: 0.1,
        }
    }
}

/// Colours painted by the terrain colouring pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainColours {
    pub ocean: FloatRgba,
    pub river: FloatRgba,
    pub shoreline: FloatRgba,
    pub low: FloatRgba,
    pub high: FloatRgba,
    pub snow: FloatRgba,
}

impl Default for TerrainColours {
    fn default() -> Self {
        Self {
            ocean: FloatRgba::rgb(0.0, 0.0, 1.0),
            river: FloatRgba::rgb(0.0, 0.0, 1.0),
            shoreline: FloatRgba::rgb(1.0, 1.0, 0.0),
            low: FloatRgba::rgb(0.0, 1.0, 0.0),
            high: FloatRgba::rgb(1.0, 0.5, 0.0),
            snow: FloatRgba::rgb(1.0, 1.0, 1.0),
        }
    }
}

/// Parameters for terrain generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub object_type: ObjectType,
    /// Seed for subdivision perturbation and terrain noise.
    pub seed: u64,

    /// Number of subdivision levels.
    pub subdivisions: u32,
    /// Leading levels that are subdivided without perturbation.
    pub subdivisions_unperturbed: u32,
    /// Perturbation box along (east, north, up) at the first perturbed level.
    pub variation: Vec3,
    /// Initial height, in units of `variation.z`.
    pub base_height: f32,

    /// Noise terms added on top of subdivision. Zero disables noise.
    pub noise_terms: u8,
    pub noise_frequency: f32,
    pub noise_amplitude: f32,
    pub noise_amplitude_decay: f32,

    /// Exponent applied to land heights.
    pub power_law: f32,
    pub snowline: SnowlineConfig,

    /// Number of river sources.
    pub rivers: u32,
    pub rivers_seed: u64,
    /// Lake size, as a fraction of the vertex count, at which a lake stops
    /// growing and becomes an inland sea.
    pub lake_becomes_sea: f32,

    /// Emissive strength of oceans and rivers.
    pub emissive: f32,
    pub colours: TerrainColours,
    /// Paints colour slot 0 high and slot 1 low everywhere.
    pub debug_disable_colours: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            object_type: ObjectType::Planet,
            seed: 0,
            subdivisions: 6,
            subdivisions_unperturbed: 1,
            variation: Vec3::new(0.0, 0.0, 0.12),
            base_height: 0.0,
            noise_terms: 0,
            noise_frequency: 1.0,
            noise_amplitude: 0.12,
            noise_amplitude_decay: 0.5,
            power_law: 1.5,
            snowline: SnowlineConfig::default(),
            rivers: 0,
            rivers_seed: 0,
            lake_becomes_sea: 0.05,
            emissive: 0.0,
            colours: TerrainColours::default(),
            debug_disable_colours: false,
        }
    }
}

impl TerrainConfig {
    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rivers_seed: seed,
            ..Default::default()
        }
    }

    /// Rugged planet with noise detail and a handful of rivers.
    pub fn earth_like(seed: u64) -> Self {
        Self {
            noise_terms: 6,
            rivers: 16,
            ..Self::with_seed(seed)
        }
    }

    /// Flat hexagonal terrain patch.
    pub fn flat_hexagon(seed: u64) -> Self {
        Self {
            object_type: ObjectType::FlatHexagon,
            ..Self::with_seed(seed)
        }
    }

    /// Loads a JSON config. Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Radius of the base sphere, or height of the base plane.
    pub fn base_level(&self) -> f32 {
        self.variation.z * self.base_height
    }

    /// Terrain seed folded to the noise generator's 32 bits.
    pub fn noise_seed(&self) -> i32 {
        fold_seed(self.seed)
    }

    /// Rejects values that would produce degenerate or unbounded meshes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subdivisions > MAX_SUBDIVISIONS {
            return Err(ConfigError::invalid(
                "subdivisions",
                format!("{} exceeds the maximum of {}", self.subdivisions, MAX_SUBDIVISIONS),
            ));
        }
        if self.variation.min_element() < 0.0 {
            return Err(ConfigError::invalid("variation", "components must be non-negative"));
        }
        if !(self.power_law > 0.0) {
            return Err(ConfigError::invalid("power_law", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.lake_becomes_sea) {
            return Err(ConfigError::invalid("lake_becomes_sea", "must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.emissive) {
            return Err(ConfigError::invalid("emissive", "must be between 0 and 1"));
        }
        if self.noise_frequency < 0.0 {
            return Err(ConfigError::invalid("noise_frequency", "must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TerrainConfig::default();

        assert_eq!(config.subdivisions, 6);
        assert_eq!(config.subdivisions_unperturbed, 1);
        assert_eq!(config.variation, Vec3::new(0.0, 0.0, 0.12));
        assert_eq!(config.power_law, 1.5);
        assert_eq!(config.snowline.equator, 0.8);
        assert_eq!(config.lake_becomes_sea, 0.05);
        assert_eq!(config.colours.high, FloatRgba::rgb(1.0, 0.5, 0.0));
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TerrainConfig =
            serde_json::from_str(r#"{"object_type":"flat_square","rivers":3,"snowline":{"pole":0.2}}"#)
                .unwrap();

        assert_eq!(config.object_type, ObjectType::FlatSquare);
        assert_eq!(config.rivers, 3);
        assert_eq!(config.snowline.pole, 0.2);
        assert_eq!(config.snowline.equator, 0.8);
        assert_eq!(config.subdivisions, 6);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 77, "subdivisions": 3}}"#).unwrap();

        let config = TerrainConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.seed, 77);
        assert_eq!(config.subdivisions, 3);
    }

    #[test]
    fn test_from_json_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"subdivisions": 40}}"#).unwrap();

        let err = TerrainConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "subdivisions", .. }));
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = TerrainConfig::default();
        config.lake_becomes_sea = 1.5;
        assert!(config.validate().is_err());

        let mut config = TerrainConfig::default();
        config.variation = Vec3::new(-0.1, 0.0, 0.0);
        assert!(config.validate().is_err());

        let mut config = TerrainConfig::default();
        config.power_law = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_object_type_shapes() {
        assert_eq!(ObjectType::Planet.flat_shape(), None);
        assert_eq!(ObjectType::FlatTriangle.flat_shape(), Some(FlatShape::Triangle));
        assert_eq!(TerrainConfig::flat_hexagon(1).object_type.flat_shape(), Some(FlatShape::Hexagon));
    }

    #[test]
    fn test_noise_seed_keeps_high_bits() {
        let low = TerrainConfig::with_seed(42);
        let high = TerrainConfig::with_seed(42 + (1 << 32));

        assert_eq!(low.noise_seed(), 42);
        assert_ne!(low.noise_seed(), high.noise_seed());
    }
}

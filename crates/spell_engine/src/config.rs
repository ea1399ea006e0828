//! Configuration for the fill spell and its collaborators
//!
//! Loaded from a JSON file; missing fields fall back to defaults.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use voxel_engine::{FillLimits, Material};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    pub fill: FillConfig,
    pub undo: UndoConfig,
    pub batches: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Flood depth for recurse mode, before the caster's radius multiplier
    pub default_size: u32,

    /// Hard cap on cells a single flood may replace
    pub max_visits: usize,

    /// Longest box edge, before the caster's construction multiplier
    pub max_dimension: u64,

    /// Largest box volume, before the caster's construction multiplier
    pub max_volume: u64,

    /// Materials the targeting ray passes through
    pub see_through: Vec<Material>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            default_size: 8,
            max_visits: 4096,
            max_dimension: FillLimits::DEFAULT_MAX_DIMENSION,
            max_volume: FillLimits::DEFAULT_MAX_VOLUME,
            see_through: vec![Material::StationaryWater, Material::Water],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UndoConfig {
    /// Undo records kept per caster; the oldest is dropped first
    pub max_entries: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { max_entries: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Cells the batch processor may touch per world tick
    pub cells_per_tick: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            cells_per_tick: 256,
        }
    }
}

impl SpellConfig {
    /// Read configuration from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read configuration from `path`, or use defaults if the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::load(path)?;
            tracing::info!(path = %path.display(), "loaded spell configuration");
            Ok(config)
        } else {
            tracing::warn!(path = %path.display(), "no config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, content).map_err(io_err)
    }
}

/// Which fill a cast performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Paint the target cell only
    Single,
    /// Flood-replace from the target cell
    Recurse,
    /// Two-point box fill; also what any unrecognised mode means
    #[default]
    #[serde(other)]
    Box,
}

impl FromStr for FillMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "single" => FillMode::Single,
            "recurse" => FillMode::Recurse,
            _ => FillMode::Box,
        })
    }
}

/// Per-cast parameters; anything unset falls back to `FillConfig`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillParameters {
    #[serde(rename = "type")]
    pub mode: FillMode,

    /// Explicit fill material, always with data value 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,

    /// Flood depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_visits: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dimension: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_volume: Option<u64>,
}

impl FillParameters {
    pub fn with_mode(mode: FillMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn max_visits(mut self, max_visits: usize) -> Self {
        self.max_visits = Some(max_visits);
        self
    }

    /// Box limits for this cast before caster scaling
    pub fn limits(&self, config: &FillConfig) -> FillLimits {
        FillLimits::new(
            self.max_dimension.unwrap_or(config.max_dimension),
            self.max_volume.unwrap_or(config.max_volume),
        )
    }

    /// Flood depth for this cast before caster scaling
    pub fn recursion_size(&self, config: &FillConfig) -> u32 {
        self.size.unwrap_or(config.default_size)
    }

    /// Cells a flood may replace; not scaled by the caster
    pub fn visit_cap(&self, config: &FillConfig) -> usize {
        self.max_visits.unwrap_or(config.max_visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SpellConfig::default();
        assert_eq!(config.fill.default_size, 8);
        assert_eq!(config.fill.max_visits, 4096);
        assert_eq!(config.fill.max_dimension, 128);
        assert_eq!(config.fill.max_volume, 512);
        assert!(config.fill.see_through.contains(&Material::Water));
        assert_eq!(config.batches.cells_per_tick, 256);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SpellConfig =
            serde_json::from_str(r#"{ "fill": { "max_volume": 4096 } }"#).unwrap();
        assert_eq!(config.fill.max_volume, 4096);
        assert_eq!(config.fill.max_dimension, 128);
        assert_eq!(config.undo, UndoConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("spells.json");

        let mut config = SpellConfig::default();
        config.fill.see_through = vec![Material::Glass];
        config.undo.max_entries = 4;
        config.save(&path).unwrap();

        assert_eq!(SpellConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(SpellConfig::load(&path), Err(ConfigError::Io { .. })));
        assert_eq!(SpellConfig::load_or_default(&path).unwrap(), SpellConfig::default());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(SpellConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_parameters_from_json() {
        let p: FillParameters = serde_json::from_str(
            r#"{ "type": "recurse", "material": "ice", "size": 20, "max_visits": 1000 }"#,
        )
        .unwrap();
        assert_eq!(p.mode, FillMode::Recurse);
        assert_eq!(p.material, Some(Material::Ice));
        assert_eq!(p.recursion_size(&FillConfig::default()), 20);
        assert_eq!(p.visit_cap(&FillConfig::default()), 1000);

        let p: FillParameters = serde_json::from_str(r#"{ "type": "whatever" }"#).unwrap();
        assert_eq!(p.mode, FillMode::Box);

        let p: FillParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(p.mode, FillMode::Box);
        assert_eq!(p.limits(&FillConfig::default()), FillLimits::new(128, 512));
        assert_eq!(p.recursion_size(&FillConfig::default()), 8);
        assert_eq!(p.visit_cap(&FillConfig::default()), 4096);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("single".parse(), Ok(FillMode::Single));
        assert_eq!("recurse".parse(), Ok(FillMode::Recurse));
        assert_eq!("".parse(), Ok(FillMode::Box));
    }
}

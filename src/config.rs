//! Assembler configuration (assembler.yaml).
//!
//! Every field is optional; a missing file means the defaults: a 1000x1000
//! canvas, the builtin palette and a quality threshold of 5.0.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssemblerError, Result};
use crate::normalize::MAX_CLEAN_DISTANCE;
use crate::types::Palette;

/// File name looked up next to `template.json`.
pub const CONFIG_FILE_NAME: &str = "assembler.yaml";

pub const DEFAULT_CANVAS_SIZE: usize = 1000;

/// Run-wide settings for the assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Canvas width in pixels.
    pub canvas_width: usize,

    /// Canvas height in pixels.
    pub canvas_height: usize,

    /// Largest palette replacement distance an autopick entry may have.
    pub max_palette_distance: f64,

    /// Palette override as `#RRGGBB` strings.
    pub palette: Option<Vec<String>>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            max_palette_distance: MAX_CLEAN_DISTANCE,
            palette: None,
        }
    }
}

impl AssemblerConfig {
    /// Load a config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AssemblerError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse and validate a config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: AssemblerConfig =
            serde_yaml::from_str(content).map_err(|e| AssemblerError::Config {
                message: format!("Invalid config: {}", e),
                help: Some(format!("Check {} syntax", CONFIG_FILE_NAME)),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `assembler.yaml` from `dir` if present, defaults otherwise.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(AssemblerError::Config {
                message: format!(
                    "Canvas size {}x{} must be non-zero",
                    self.canvas_width, self.canvas_height
                ),
                help: None,
            });
        }
        if self.max_palette_distance.is_nan() || self.max_palette_distance < 0.0 {
            return Err(AssemblerError::Config {
                message: format!(
                    "max_palette_distance must be a non-negative number, got {}",
                    self.max_palette_distance
                ),
                help: None,
            });
        }
        Ok(())
    }

    /// The palette for this run: the override if given, else the builtin one.
    pub fn palette(&self) -> Result<Palette> {
        match &self.palette {
            Some(hex) => Palette::from_hex_list("custom", hex),
            None => Ok(Palette::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AssemblerConfig::parse("{}").unwrap();
        assert_eq!(config, AssemblerConfig::default());
        assert_eq!(config.canvas_width, 1000);
        assert_eq!(config.max_palette_distance, 5.0);
        assert_eq!(config.palette().unwrap().len(), 32);
    }

    #[test]
    fn test_overrides() {
        let config = AssemblerConfig::parse(
            "canvas_width: 64\ncanvas_height: 32\nmax_palette_distance: 2.5\npalette:\n  - \"#000000\"\n  - \"#FFFFFF\"\n",
        )
        .unwrap();
        assert_eq!((config.canvas_width, config.canvas_height), (64, 32));
        assert_eq!(config.max_palette_distance, 2.5);
        assert_eq!(config.palette().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_zero_canvas() {
        assert!(AssemblerConfig::parse("canvas_width: 0").is_err());
    }

    #[test]
    fn test_rejects_negative_distance() {
        assert!(AssemblerConfig::parse("max_palette_distance: -1").is_err());
    }

    #[test]
    fn test_bad_palette_entry() {
        let config = AssemblerConfig::parse("palette: [\"#12\"]").unwrap();
        assert!(config.palette().is_err());

        let config = AssemblerConfig::parse("palette: [\"1é123\"]").unwrap();
        assert!(matches!(config.palette(), Err(AssemblerError::Parse { .. })));
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempdir().unwrap();
        assert_eq!(
            AssemblerConfig::load_or_default(dir.path()).unwrap(),
            AssemblerConfig::default()
        );

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "canvas_width: 10\n").unwrap();
        let config = AssemblerConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.canvas_width, 10);
        assert_eq!(config.canvas_height, 1000);
    }
}

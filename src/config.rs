//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/zoompack/zoompack.toml`
//! 3. Environment variables: `ZOOMPACK_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Chart geometry and transition settings.
///
/// All lengths share one logical unit (pixels for SVG renderers); durations
/// share the unit of the frame clock driving [`crate::domain::Camera`]
/// (milliseconds for browser-style clocks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Diameter of the outer bubble
    pub diameter: f64,
    /// Extra space around the focused circle when framing it
    pub margin: f64,
    /// Inter-circle padding, also the inset between a circle and its children
    pub padding: f64,
    /// Thickness of the sector ring on each circle's outline
    pub ring_thickness: f64,
    /// Input field carrying per-node sector weights
    pub pie_source_field: String,
    /// Duration of a normal focus transition
    pub transition_duration_normal: f64,
    /// Duration of the slow (inspection) focus transition
    pub transition_duration_slow: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            diameter: 800.0,
            margin: 20.0,
            padding: 2.0,
            ring_thickness: 20.0,
            pie_source_field: "sectors".to_string(),
            transition_duration_normal: 750.0,
            transition_duration_slow: 7500.0,
        }
    }
}

impl ChartConfig {
    /// Load configuration with layered precedence.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            builder = builder.add_source(File::from(global_path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("ZOOMPACK").try_parsing(true));

        let loaded: ChartConfig = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the layout math cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("diameter", self.diameter),
            ("ring_thickness", self.ring_thickness),
            ("transition_duration_normal", self.transition_duration_normal),
            ("transition_duration_slow", self.transition_duration_slow),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Message(format!(
                    "{} must be a positive number, got {}",
                    key, value
                )));
            }
        }
        let non_negative = [("margin", self.margin), ("padding", self.padding)];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Message(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
        }
        if self.pie_source_field.is_empty() {
            return Err(ConfigError::Message(
                "pie_source_field must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path of the global config file, if a home directory can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "zoompack")
        .map(|dirs| dirs.config_dir().join("zoompack.toml"))
}

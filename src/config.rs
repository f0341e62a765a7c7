//! Configuration for the icon analyzer.
//!
//! Every policy value lives in [`AnalyzerConfig`]; the defaults come from
//! [`crate::constants`].
//!
//! # Configuration Loading
//!
//! ```no_run
//! use iconscan::AnalyzerConfig;
//! use std::path::Path;
//!
//! // Load from file, missing fields fall back to defaults
//! let config = AnalyzerConfig::from_json_file(Path::new("iconscan.json"))?;
//!
//! // Or use defaults
//! let config = AnalyzerConfig::default();
//! # Ok::<(), iconscan::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{sampling, thresholds};
use crate::error::{AnalysisError, Result};

/// Tunable parameters for sampling and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Pixels with alpha strictly above this are opaque
    pub alpha_threshold: u8,

    /// Maximum Euclidean RGB distance (exclusive) to count as similar
    pub color_distance_threshold: f64,

    /// Similarity ratio must exceed this (0.0-1.0)
    pub similarity_threshold: f64,

    /// Transparency ratio must exceed this (0.0-1.0)
    pub transparency_threshold: f64,

    /// Luminance strictly below this is dark (0.0-1.0)
    pub dark_luminance_threshold: f64,

    /// Width of the downsampled buffer
    pub sample_width: u32,

    /// Height of the downsampled buffer
    pub sample_height: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: thresholds::ALPHA_OPAQUE_THRESHOLD,
            color_distance_threshold: thresholds::COLOR_DISTANCE_THRESHOLD,
            similarity_threshold: thresholds::SIMILARITY_RATIO_THRESHOLD,
            transparency_threshold: thresholds::TRANSPARENCY_RATIO_THRESHOLD,
            dark_luminance_threshold: thresholds::DARK_LUMINANCE_THRESHOLD,
            sample_width: sampling::SAMPLE_WIDTH,
            sample_height: sampling::SAMPLE_HEIGHT,
        }
    }
}

impl AnalyzerConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.sample_width == 0 {
            return Err(invalid("sample_width", self.sample_width));
        }
        if self.sample_height == 0 {
            return Err(invalid("sample_height", self.sample_height));
        }
        if !self.color_distance_threshold.is_finite() || self.color_distance_threshold < 0.0 {
            return Err(invalid("color_distance_threshold", self.color_distance_threshold));
        }
        for (name, value) in [
            ("similarity_threshold", self.similarity_threshold),
            ("transparency_threshold", self.transparency_threshold),
            ("dark_luminance_threshold", self.dark_luminance_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(name, value));
            }
        }
        Ok(())
    }

    /// Number of pixels in one sample
    pub fn sample_pixels(&self) -> usize {
        self.sample_width as usize * self.sample_height as usize
    }

    /// Parse configuration from a JSON string and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::config("Failed to parse analyzer configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize analyzer configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}

fn invalid(parameter: &str, value: impl ToString) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
    }
}

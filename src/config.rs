//! Configuration structures for the shade matching engine.
//!
//! This module defines all tunable parameters for skin sampling, face region
//! sampling and catalog matching. Defaults come from [`crate::constants`].
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use shade_match::EngineConfig;
//! use std::path::Path;
//!
//! // Load from file; omitted fields keep their defaults
//! let config = EngineConfig::from_json_file(Path::new("engine.json"))?;
//!
//! // Or use defaults
//! let config = EngineConfig::default();
//! # Ok::<(), shade_match::EngineError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`SamplerConfig`]: skin pixel filtering and outlier trimming
//! - [`RegionConfig`]: fixed face regions reported with an analysis
//! - [`MatchConfig`]: ranking, undertone penalty and parallelism

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::regions::{FaceRegion, RegionBox};
use crate::color::DeltaEMethod;
use crate::constants::{matching, sampling};
use crate::{EngineError, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Skin sampling configuration
    pub sampler: SamplerConfig,

    /// Face region sampling configuration
    pub regions: RegionConfig,

    /// Catalog matching configuration
    pub matching: MatchConfig,
}

/// Skin pixel sampling parameters.
///
/// Controls which pixels count as skin and how the lightness-sorted
/// samples are trimmed before representatives are picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Approximate number of pixels visited per image
    pub target_sample_count: usize,

    /// Minimum alpha for a pixel to be considered
    pub min_alpha: u8,

    /// Green/blue dominance ratio that marks a pixel as background
    pub dominance_ratio: f64,

    /// Dominant channel must exceed this value to reject the pixel
    pub dominance_floor: u8,

    /// Minimum surviving pixels
    pub min_samples: usize,

    /// Fraction trimmed from each end of the sorted samples (0.0-0.5)
    pub trim_fraction: f64,

    /// Upper bound on the per-side trim fraction
    pub max_trim_fraction: f64,

    /// Percentile (0.0-1.0) of the lightest representative
    pub light_percentile: f64,

    /// Percentile (0.0-1.0) of the darkest representative
    pub dark_percentile: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            target_sample_count: sampling::TARGET_SAMPLE_COUNT,
            min_alpha: sampling::MIN_ALPHA,
            dominance_ratio: sampling::CHANNEL_DOMINANCE_RATIO,
            dominance_floor: sampling::CHANNEL_DOMINANCE_FLOOR,
            min_samples: sampling::MIN_SKIN_SAMPLES,
            trim_fraction: sampling::TRIM_FRACTION,
            max_trim_fraction: sampling::MAX_TRIM_FRACTION,
            light_percentile: sampling::LIGHT_PERCENTILE,
            dark_percentile: sampling::DARK_PERCENTILE,
        }
    }
}

/// Face region sampling parameters.
///
/// Regions are fractional boxes of the frame, assuming a roughly centered,
/// front-facing portrait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Regions to sample, in report order
    pub boxes: Vec<RegionBox>,

    /// Approximate number of pixels visited per region
    pub samples_per_region: usize,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            boxes: vec![
                RegionBox::new(FaceRegion::Forehead, 0.35, 0.15, 0.65, 0.30),
                RegionBox::new(FaceRegion::LeftCheek, 0.20, 0.45, 0.38, 0.62),
                RegionBox::new(FaceRegion::RightCheek, 0.62, 0.45, 0.80, 0.62),
                RegionBox::new(FaceRegion::Chin, 0.40, 0.78, 0.60, 0.90),
            ],
            samples_per_region: 400,
        }
    }
}

/// Catalog matching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Matches returned when the caller passes no limit
    pub default_limit: usize,

    /// ΔE added to undertone-incompatible entries before ranking
    pub undertone_penalty: f64,

    /// ΔE scale of the match percentage curve
    pub match_scale: f64,

    /// Ranking formula
    pub method: DeltaEMethod,

    /// Skip entries whose ΔE76 exceeds this bound before the ranking pass
    pub prune_delta_e76: Option<f64>,

    /// Catalog size at which scanning is sharded across threads
    pub parallel_threshold: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            default_limit: matching::DEFAULT_MATCH_LIMIT,
            undertone_penalty: matching::UNDERTONE_PENALTY,
            match_scale: matching::MATCH_SCALE,
            method: DeltaEMethod::Ciede2000,
            prune_delta_e76: None,
            parallel_threshold: matching::PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::config("Invalid configuration JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| EngineError::config(format!("Failed to write {}", path.display()), e))
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        self.sampler.validate()?;
        self.regions.validate()?;
        self.matching.validate()
    }
}

impl SamplerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_sample_count == 0 {
            return Err(EngineError::invalid_parameter("sampler.target_sample_count", 0));
        }
        if self.min_samples == 0 {
            return Err(EngineError::invalid_parameter("sampler.min_samples", 0));
        }
        if self.dominance_ratio < 1.0 {
            return Err(EngineError::invalid_parameter(
                "sampler.dominance_ratio",
                self.dominance_ratio,
            ));
        }
        if !(0.0..0.5).contains(&self.trim_fraction) {
            return Err(EngineError::invalid_parameter("sampler.trim_fraction", self.trim_fraction));
        }
        if !(0.0..0.5).contains(&self.max_trim_fraction) {
            return Err(EngineError::invalid_parameter(
                "sampler.max_trim_fraction",
                self.max_trim_fraction,
            ));
        }
        for (name, value) in [
            ("sampler.light_percentile", self.light_percentile),
            ("sampler.dark_percentile", self.dark_percentile),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::invalid_parameter(name, value));
            }
        }
        if self.dark_percentile > self.light_percentile {
            return Err(EngineError::invalid_parameter(
                "sampler.dark_percentile",
                self.dark_percentile,
            ));
        }
        Ok(())
    }
}

impl RegionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_region == 0 {
            return Err(EngineError::invalid_parameter("regions.samples_per_region", 0));
        }
        for region_box in &self.boxes {
            if !region_box.is_valid() {
                return Err(EngineError::invalid_parameter(
                    "regions.boxes",
                    format!("{:?}", region_box),
                ));
            }
        }
        Ok(())
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.undertone_penalty.is_nan() || self.undertone_penalty < 0.0 {
            return Err(EngineError::invalid_parameter(
                "matching.undertone_penalty",
                self.undertone_penalty,
            ));
        }
        if self.match_scale.is_nan() || self.match_scale <= 0.0 {
            return Err(EngineError::invalid_parameter("matching.match_scale", self.match_scale));
        }
        if let Some(bound) = self.prune_delta_e76 {
            if bound.is_nan() || bound <= 0.0 {
                return Err(EngineError::invalid_parameter("matching.prune_delta_e76", bound));
            }
        }
        if self.parallel_threshold == 0 {
            return Err(EngineError::invalid_parameter("matching.parallel_threshold", 0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"matching": {"undertone_penalty": 8.0}}"#).unwrap();
        assert_eq!(config.matching.undertone_penalty, 8.0);
        assert_eq!(config.matching.default_limit, matching::DEFAULT_MATCH_LIMIT);
        assert_eq!(config.sampler, SamplerConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = EngineConfig::from_json_str(r#"{"matching": {"match_scale": 0.0}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { .. }));

        let err =
            EngineConfig::from_json_str(r#"{"sampler": {"trim_fraction": 0.6}}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { .. }));

        let err = EngineConfig::from_json_str(r#"{"sampler": "nope"}"#).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError { .. }));
    }

    #[test]
    fn test_file_roundtrip() {
        let path =
            std::env::temp_dir().join(format!("shade_match_config_{}.json", std::process::id()));
        let mut config = EngineConfig::default();
        config.matching.prune_delta_e76 = Some(40.0);

        config.to_json_file(&path).unwrap();
        let loaded = EngineConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_json_file(Path::new("/nonexistent/engine.json")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigError { .. }));
    }
}

//! Skin tone analysis
//!
//! Combines skin sampling, face region sampling and tone classification
//! into a [`SkinToneAnalysis`] with confidence scores. Results are plain
//! values; persisting them is the caller's decision.

use log::debug;
use palette::{white_point::D65, Lch};
use serde::Serialize;

use super::classifier::{DepthBucket, ToneClassifier, UndertoneLabel};
use super::pixels::PixelSource;
use super::regions::{RegionSample, RegionSampler};
use super::sampler::{SampledTone, SkinSampler, ToneSample};
use crate::color::{delta_e2000, LabColor};
use crate::config::EngineConfig;
use crate::constants::tone;
use crate::Result;

/// One classified skin tone
#[derive(Debug, Clone, Serialize)]
pub struct ToneReading {
    /// Uppercase `#RRGGBB`
    pub hex: String,
    /// CIE Lab coordinates
    pub lab: LabColor,
    /// CIE LCh coordinates (cylindrical Lab representation)
    pub lch: Lch<D65, f64>,
    pub undertone: UndertoneLabel,
    pub depth: DepthBucket,
    /// 1 (lightest) to 10 (deepest)
    pub depth_level: u8,
    /// Analysis confidence score (0.0 = low, 1.0 = high)
    pub confidence: f64,
}

/// Complete skin tone analysis of one frame
#[derive(Debug, Clone, Serialize)]
pub struct SkinToneAnalysis {
    pub dominant: ToneReading,
    /// Darker secondary tone, when clearly distinct from the dominant one
    pub secondary: Option<ToneReading>,
    /// Per-region averages; regions without skin pixels are absent
    pub regions: Vec<RegionSample>,
    /// Skin pixels that survived filtering
    pub sample_count: usize,
    /// Raw sampler output the readings were derived from
    pub tones: ToneSample,
}

/// Skin tone analyzer
#[derive(Debug, Clone, Default)]
pub struct SkinToneAnalyzer {
    sampler: SkinSampler,
    regions: RegionSampler,
    classifier: ToneClassifier,
}

impl SkinToneAnalyzer {
    /// Create an analyzer with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer from engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            sampler: SkinSampler::with_config(config.sampler.clone()),
            regions: RegionSampler::with_config(config.regions.clone()),
            classifier: ToneClassifier::default(),
        }
    }

    /// Replace the classification policy
    pub fn with_classifier(mut self, classifier: ToneClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn sampler(&self) -> &SkinSampler {
        &self.sampler
    }

    pub fn classifier(&self) -> &ToneClassifier {
        &self.classifier
    }

    /// Analyze a frame
    ///
    /// # Errors
    ///
    /// Returns `InsufficientSamples` if the frame has too few skin pixels.
    /// No low-confidence guess is produced in that case.
    pub fn analyze<P: PixelSource + ?Sized>(&self, pixels: &P) -> Result<SkinToneAnalysis> {
        let tones = self.sampler.sample(pixels)?;
        let regions = self.regions.sample_regions(pixels, &self.sampler);

        let confidence = compute_confidence(tones.sample_count, tones.spread);
        let dominant = self.reading(&tones.median, confidence);

        let separation = delta_e2000(&tones.median.lab, &tones.darkest.lab);
        let secondary = (separation >= tone::SECONDARY_TONE_MIN_DELTA_E).then(|| {
            self.reading(&tones.darkest, confidence * tone::SECONDARY_CONFIDENCE_FACTOR)
        });

        debug!(
            "analysis: dominant {} ({} {}), secondary {:?}, {} regions, confidence {:.2}",
            dominant.hex,
            dominant.depth.label(),
            dominant.undertone.descriptor,
            secondary.as_ref().map(|s| s.hex.as_str()),
            regions.len(),
            confidence
        );

        Ok(SkinToneAnalysis {
            dominant,
            secondary,
            regions,
            sample_count: tones.sample_count,
            tones,
        })
    }

    /// Classify a single color into a reading with the given confidence
    pub fn reading(&self, tone: &SampledTone, confidence: f64) -> ToneReading {
        let classification = self.classifier.classify(&tone.lab);
        ToneReading {
            hex: tone.hex(),
            lab: tone.lab,
            lch: tone.lab.to_lch(),
            undertone: classification.undertone,
            depth: classification.depth,
            depth_level: classification.depth_level,
            confidence,
        }
    }
}

/// Confidence from sample size and tone spread
fn compute_confidence(sample_count: usize, spread: f64) -> f64 {
    // Size score: more skin pixels = higher confidence
    let size_score: f64 = if sample_count >= 500 {
        1.0
    } else if sample_count >= 100 {
        0.8
    } else {
        0.5
    };

    // Spread score: tighter tone cluster = higher confidence
    let spread_score: f64 = if spread < 5.0 {
        1.0
    } else if spread < 10.0 {
        0.7
    } else {
        0.4
    };

    (0.5 * size_score + 0.5 * spread_score).clamp(0.0, 1.0)
}

//! Skin tone sampling
//!
//! Extracts representative light and dark skin tones from a frame:
//! - Strided sampling so roughly the same number of pixels is visited
//!   at any resolution
//! - Rejection of transparent pixels and green/blue dominated background
//! - Lightness-sorted outlier trimming
//! - Percentile representatives instead of min/max, to resist specular
//!   highlights and shadows
//!
//! Algorithm tag: `algo-robust-skin-sampling`

use log::{debug, trace};
use serde::Serialize;

use super::pixels::{PixelSource, Rgba};
use crate::color::{delta_e76, LabColor, RgbColor};
use crate::config::SamplerConfig;
use crate::{EngineError, Result};

/// A sampled pixel color with its Lab coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampledTone {
    pub rgb: RgbColor,
    pub lab: LabColor,
}

impl SampledTone {
    pub fn from_rgb(rgb: RgbColor) -> Self {
        Self { rgb, lab: rgb.to_lab() }
    }

    pub fn hex(&self) -> String {
        self.rgb.to_hex()
    }
}

/// Representative tones of one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToneSample {
    /// High-percentile tone of the trimmed set
    pub lightest: SampledTone,
    /// Low-percentile tone of the trimmed set
    pub darkest: SampledTone,
    /// Median tone of the trimmed set
    pub median: SampledTone,
    /// Skin pixels that survived filtering, before trimming
    pub sample_count: usize,
    /// RMS ΔE76 of the trimmed set around the median
    pub spread: f64,
}

impl ToneSample {
    pub fn lightest_hex(&self) -> String {
        self.lightest.hex()
    }

    pub fn darkest_hex(&self) -> String {
        self.darkest.hex()
    }
}

/// Skin sampler implementing strided filtering and percentile extraction
#[derive(Debug, Clone, Default)]
pub struct SkinSampler {
    config: SamplerConfig,
}

impl SkinSampler {
    /// Create a sampler with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sampler with custom parameters
    pub fn with_config(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Extract lightest and darkest skin tones from a frame
    ///
    /// # Errors
    ///
    /// Returns `InsufficientSamples` when fewer than `min_samples` pixels
    /// pass the skin filter, and whenever none do, including for empty
    /// frames.
    pub fn sample<P: PixelSource + ?Sized>(&self, pixels: &P) -> Result<ToneSample> {
        let mut samples = self.collect_candidates(pixels);
        let sample_count = samples.len();

        if sample_count == 0 || sample_count < self.config.min_samples {
            debug!(
                "only {} skin samples in {}x{} frame (minimum {})",
                sample_count,
                pixels.width(),
                pixels.height(),
                self.config.min_samples
            );
            return Err(EngineError::InsufficientSamples {
                found: sample_count,
                minimum: self.config.min_samples,
            });
        }

        samples.sort_by(|a, b| a.lab.l().total_cmp(&b.lab.l()));
        let trimmed = self.trim_outliers(&samples);

        let lightest = trimmed[percentile_index(trimmed.len(), self.config.light_percentile)];
        let darkest = trimmed[percentile_index(trimmed.len(), self.config.dark_percentile)];
        let median = trimmed[trimmed.len() / 2];
        let spread = rms_spread(trimmed, &median.lab);

        debug!(
            "skin sampling: {} samples, {} after trim, light {} dark {} spread {:.2}",
            sample_count,
            trimmed.len(),
            lightest.hex(),
            darkest.hex(),
            spread
        );

        Ok(ToneSample {
            lightest,
            darkest,
            median,
            sample_count,
            spread,
        })
    }

    /// Check whether a pixel can plausibly be skin
    ///
    /// Rejects near-transparent pixels and pixels whose green or blue channel
    /// exceeds the dominance floor and both other channels by the dominance
    /// ratio (foliage, sky, clothing).
    pub fn is_skin_candidate(&self, pixel: Rgba) -> bool {
        if pixel.a < self.config.min_alpha {
            return false;
        }
        !(self.dominates(pixel.g, pixel.r, pixel.b) || self.dominates(pixel.b, pixel.r, pixel.g))
    }

    /// Pixel stride so roughly `target_sample_count` pixels are visited
    pub fn stride(&self, width: u32, height: u32) -> usize {
        let area = f64::from(width) * f64::from(height);
        let step = (area / self.config.target_sample_count as f64).sqrt().floor();
        (step as usize).max(1)
    }

    fn dominates(&self, channel: u8, other1: u8, other2: u8) -> bool {
        let ratio = self.config.dominance_ratio;
        channel > self.config.dominance_floor
            && f64::from(channel) > ratio * f64::from(other1)
            && f64::from(channel) > ratio * f64::from(other2)
    }

    fn collect_candidates<P: PixelSource + ?Sized>(&self, pixels: &P) -> Vec<SampledTone> {
        let (width, height) = (pixels.width(), pixels.height());
        let step = self.stride(width, height);
        let mut samples = Vec::with_capacity(self.config.target_sample_count + 1);
        let mut visited = 0usize;

        for y in (0..height).step_by(step) {
            for x in (0..width).step_by(step) {
                visited += 1;
                let pixel = pixels.pixel(x, y);
                if self.is_skin_candidate(pixel) {
                    samples.push(SampledTone::from_rgb(pixel.rgb()));
                }
            }
        }

        trace!("visited {} pixels at stride {}, kept {}", visited, step, samples.len());
        samples
    }

    /// Drop the darkest and lightest tails of a lightness-sorted sample set
    fn trim_outliers<'a>(&self, sorted: &'a [SampledTone]) -> &'a [SampledTone] {
        let n = sorted.len();
        let per_side = (n as f64 * self.config.trim_fraction).floor() as usize;
        let cap = (n as f64 * self.config.max_trim_fraction).floor() as usize;
        // At least one sample survives whatever the configured fractions
        let trim = per_side.min(cap).min(n.saturating_sub(1) / 2);
        &sorted[trim..n - trim]
    }
}

/// Index of the `p`-th percentile (0.0-1.0) in a sorted slice of `len` items
fn percentile_index(len: usize, p: f64) -> usize {
    debug_assert!(len > 0);
    ((len as f64 * p).floor() as usize).min(len - 1)
}

fn rms_spread(samples: &[SampledTone], center: &LabColor) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|s| {
            let d = delta_e76(&s.lab, center);
            d * d
        })
        .sum();
    (sum_sq / samples.len() as f64).sqrt()
}

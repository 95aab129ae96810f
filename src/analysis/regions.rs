//! Fixed-heuristic face region sampling
//!
//! Regions are fractional boxes of the frame that assume a centered,
//! front-facing portrait. No landmark detection is attempted; a region
//! with no skin-colored pixels is simply left out of the report.

use serde::{Deserialize, Serialize};

use super::pixels::PixelSource;
use super::sampler::SkinSampler;
use crate::color::{LabColor, RgbColor};
use crate::config::RegionConfig;

/// Named face region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceRegion {
    Forehead,
    LeftCheek,
    RightCheek,
    Chin,
}

/// Region bounds as fractions (0.0-1.0) of frame width and height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBox {
    pub region: FaceRegion,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl RegionBox {
    pub const fn new(region: FaceRegion, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            region,
            left,
            top,
            right,
            bottom,
        }
    }

    /// Bounds lie inside the unit square and enclose a positive area
    pub fn is_valid(&self) -> bool {
        let unit = 0.0..=1.0;
        unit.contains(&self.left)
            && unit.contains(&self.top)
            && unit.contains(&self.right)
            && unit.contains(&self.bottom)
            && self.left < self.right
            && self.top < self.bottom
    }

    /// Pixel bounds `(x0, y0, x1, y1)`, end-exclusive, for a frame size
    fn pixel_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let scale = |fraction: f64, extent: u32| (fraction * f64::from(extent)).floor() as u32;
        let x0 = scale(self.left, width).min(width);
        let y0 = scale(self.top, height).min(height);
        let x1 = scale(self.right, width).clamp(x0, width);
        let y1 = scale(self.bottom, height).clamp(y0, height);
        (x0, y0, x1, y1)
    }
}

/// Average skin color of one face region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSample {
    pub region: FaceRegion,
    pub hex: String,
    pub rgb: RgbColor,
    pub lab: LabColor,
    pub pixel_count: usize,
}

/// Samples the configured face regions
#[derive(Debug, Clone, Default)]
pub struct RegionSampler {
    config: RegionConfig,
}

impl RegionSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegionConfig) -> Self {
        Self { config }
    }

    /// Average the skin pixels of every region
    ///
    /// `filter` decides which pixels count as skin, so regions and the
    /// whole-frame sampler agree on what they discard.
    pub fn sample_regions<P: PixelSource + ?Sized>(
        &self,
        pixels: &P,
        filter: &SkinSampler,
    ) -> Vec<RegionSample> {
        self.config
            .boxes
            .iter()
            .filter_map(|region_box| self.sample_region(pixels, filter, region_box))
            .collect()
    }

    fn sample_region<P: PixelSource + ?Sized>(
        &self,
        pixels: &P,
        filter: &SkinSampler,
        region_box: &RegionBox,
    ) -> Option<RegionSample> {
        let (x0, y0, x1, y1) = region_box.pixel_bounds(pixels.width(), pixels.height());
        let area = f64::from(x1 - x0) * f64::from(y1 - y0);
        let step = ((area / self.config.samples_per_region as f64).sqrt().floor() as usize).max(1);

        let mut sums = [0u64; 3];
        let mut count = 0usize;
        for y in (y0..y1).step_by(step) {
            for x in (x0..x1).step_by(step) {
                let pixel = pixels.pixel(x, y);
                if filter.is_skin_candidate(pixel) {
                    sums[0] += u64::from(pixel.r);
                    sums[1] += u64::from(pixel.g);
                    sums[2] += u64::from(pixel.b);
                    count += 1;
                }
            }
        }

        if count == 0 {
            return None;
        }

        let mean = |sum: u64| ((sum as f64 / count as f64).round() as u64).min(255) as u8;
        let rgb = RgbColor::new(mean(sums[0]), mean(sums[1]), mean(sums[2]));

        Some(RegionSample {
            region: region_box.region,
            hex: rgb.to_hex(),
            rgb,
            lab: rgb.to_lab(),
            pixel_count: count,
        })
    }
}

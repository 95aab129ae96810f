//! Reference values and policy constants for skin-tone analysis and matching
//!
//! Colorimetric constants follow CIE 15:2004. Policy thresholds (depth
//! buckets, undertone penalty, sampling heuristics) are tunable values and
//! are kept here so every consumer reads the same numbers.

/// D65 Standard Illuminant Reference
///
/// CIE Standard Illuminant D65 represents average daylight with a correlated
/// color temperature of 6504K. This is the standard reference for digital
/// images and computer displays.
pub mod d65 {
    /// D65 white point in CIE XYZ on the 0..100 scale
    pub const WHITE_POINT_XYZ: [f64; 3] = [95.047, 100.000, 108.883];

    /// Linear sRGB to XYZ (D65) matrix, IEC 61966-2-1
    pub const SRGB_TO_XYZ: [[f64; 3]; 3] = [
        [0.4124564, 0.3575761, 0.1804375],
        [0.2126729, 0.7151522, 0.0721750],
        [0.0193339, 0.1191920, 0.9503041],
    ];
}

/// CIE Lab nonlinearity constants
pub mod cie {
    /// Threshold below which f(t) is linear (216/24389 ≈ 0.008856)
    pub const EPSILON: f64 = 216.0 / 24389.0;

    /// Slope of the linear segment (24389/27 ≈ 903.3)
    pub const KAPPA: f64 = 24389.0 / 27.0;

    /// sRGB transfer function knee
    pub const SRGB_LINEAR_KNEE: f64 = 0.04045;

    /// 25^7, used by the CIEDE2000 chroma terms
    pub const POW25_7: f64 = 6_103_515_625.0;
}

/// Skin pixel sampling heuristics
pub mod sampling {
    /// Approximate number of pixels visited per image regardless of resolution
    pub const TARGET_SAMPLE_COUNT: usize = 1000;

    /// Pixels with alpha below this are treated as transparent
    pub const MIN_ALPHA: u8 = 200;

    /// A green or blue channel this many times larger than both others is non-skin
    pub const CHANNEL_DOMINANCE_RATIO: f64 = 1.2;

    /// Dominance only rejects a pixel when the dominant channel exceeds this
    pub const CHANNEL_DOMINANCE_FLOOR: u8 = 80;

    /// Fewer surviving pixels than this fails the analysis
    pub const MIN_SKIN_SAMPLES: usize = 10;

    /// Fraction trimmed from each end of the lightness-sorted samples
    pub const TRIM_FRACTION: f64 = 0.05;

    /// Upper bound on the per-side trim, as a fraction of the sample set
    pub const MAX_TRIM_FRACTION: f64 = 0.25;

    /// Percentile index of the lightest representative
    pub const LIGHT_PERCENTILE: f64 = 0.95;

    /// Percentile index of the darkest representative
    pub const DARK_PERCENTILE: f64 = 0.05;
}

/// Depth and analysis thresholds
pub mod tone {
    /// L* lower bound of the fair (very light) bucket
    pub const FAIR_MIN_LIGHTNESS: f64 = 80.0;

    /// L* lower bound of the light bucket
    pub const LIGHT_MIN_LIGHTNESS: f64 = 65.0;

    /// L* lower bound of the medium bucket
    pub const MEDIUM_MIN_LIGHTNESS: f64 = 50.0;

    /// L* lower bound of the tan/deep bucket; anything darker is very deep
    pub const DEEP_MIN_LIGHTNESS: f64 = 35.0;

    /// L* width of one step on the 1-10 depth scale
    pub const DEPTH_LEVEL_STEP: f64 = 8.0;

    /// Minimum ΔE2000 between dominant and darkest tone to report a secondary tone
    pub const SECONDARY_TONE_MIN_DELTA_E: f64 = 5.0;

    /// Secondary tones are reported with this fraction of the dominant confidence
    pub const SECONDARY_CONFIDENCE_FACTOR: f64 = 0.8;
}

/// Catalog matching policy
pub mod matching {
    /// Number of matches returned when the caller does not specify one
    pub const DEFAULT_MATCH_LIMIT: usize = 5;

    /// ΔE added to entries whose undertone is incompatible with the hint
    pub const UNDERTONE_PENALTY: f64 = 5.0;

    /// ΔE at which the match percentage falls to 100/e
    pub const MATCH_SCALE: f64 = 10.0;

    /// Catalogs at least this large are scanned in parallel shards
    pub const PARALLEL_THRESHOLD: usize = 4096;
}

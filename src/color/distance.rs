//! Perceptual color difference
//!
//! ΔE76 is the Euclidean distance in Lab and is cheap enough for coarse
//! pruning. CIEDE2000 (CIE 142-2001) is the ranking metric; it follows
//! Sharma, Wu and Dalal (2005) including their conventions for hue
//! wraparound and zero-chroma colors, so results reproduce the published
//! test pairs.
//!
//! Algorithm tag: `algo-ciede2000`

#![allow(clippy::many_single_char_names)]

use serde::{Deserialize, Serialize};

use super::conversion::{hue_angle, LabColor};
use crate::constants::cie::POW25_7;

/// Color difference formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaEMethod {
    #[serde(rename = "cie76")]
    Cie76,
    #[default]
    #[serde(rename = "ciede2000")]
    Ciede2000,
}

/// Compute the color difference with the selected formula
pub fn delta_e(method: DeltaEMethod, a: &LabColor, b: &LabColor) -> f64 {
    match method {
        DeltaEMethod::Cie76 => delta_e76(a, b),
        DeltaEMethod::Ciede2000 => delta_e2000(a, b),
    }
}

/// CIE76 ΔE: Euclidean distance in Lab
pub fn delta_e76(a: &LabColor, b: &LabColor) -> f64 {
    let dl = a.l() - b.l();
    let da = a.a() - b.a();
    let db = a.b() - b.b();
    (dl * dl + da * da + db * db).sqrt()
}

/// CIEDE2000 ΔE00 with unit parametric factors (kL = kC = kH = 1)
///
/// Symmetric in its arguments and never NaN for finite input. Achromatic
/// colors get hue 0 and contribute no hue difference.
pub fn delta_e2000(lab1: &LabColor, lab2: &LabColor) -> f64 {
    let (l1, a1, b1) = (lab1.l(), lab1.a(), lab1.b());
    let (l2, a2, b2) = (lab2.l(), lab2.a(), lab2.b());

    // Chroma correction of a*
    let c_mean = (a1.hypot(b1) + a2.hypot(b2)) / 2.0;
    let c_mean7 = c_mean.powi(7);
    let g = 0.5 * (1.0 - (c_mean7 / (c_mean7 + POW25_7)).sqrt());

    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);
    let c1p = a1p.hypot(b1);
    let c2p = a2p.hypot(b2);
    let h1p = hue_angle(a1p, b1);
    let h2p = hue_angle(a2p, b2);
    let chroma_product = c1p * c2p;

    // Differences
    let dl = l2 - l1;
    let dc = c2p - c1p;
    let dh_angle = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff > 180.0 {
            diff - 360.0
        } else if diff < -180.0 {
            diff + 360.0
        } else {
            diff
        }
    };
    let dh = 2.0 * chroma_product.sqrt() * (dh_angle.to_radians() / 2.0).sin();

    // Means
    let l_mean = (l1 + l2) / 2.0;
    let cp_mean = (c1p + c2p) / 2.0;
    let h_mean = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    // Weighting functions
    let t = 1.0 - 0.17 * (h_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_mean).to_radians().cos()
        + 0.32 * (3.0 * h_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_mean - 63.0).to_radians().cos();

    let l_offset = (l_mean - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_offset / (20.0 + l_offset).sqrt();
    let sc = 1.0 + 0.045 * cp_mean;
    let sh = 1.0 + 0.015 * cp_mean * t;

    // Blue-region rotation
    let d_theta = 30.0 * (-((h_mean - 275.0) / 25.0).powi(2)).exp();
    let cp_mean7 = cp_mean.powi(7);
    let rc = 2.0 * (cp_mean7 / (cp_mean7 + POW25_7)).sqrt();
    let rt = -(2.0 * d_theta).to_radians().sin() * rc;

    let term_l = dl / sl;
    let term_c = dc / sc;
    let term_h = dh / sh;

    (term_l * term_l + term_c * term_c + term_h * term_h + rt * term_c * term_h)
        .max(0.0)
        .sqrt()
}

/// Perceptual category of a ΔE00 value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaECategory {
    /// ΔE00 < 1.0
    Imperceptible,
    /// ΔE00 1.0-2.0, visible on close inspection
    BarelyPerceptible,
    /// ΔE00 2.0-10.0
    Noticeable,
    /// ΔE00 10.0-50.0
    Distinct,
    /// ΔE00 >= 50.0
    VeryDistinct,
}

impl DeltaECategory {
    pub fn from_delta_e(delta_e: f64) -> Self {
        if delta_e < 1.0 {
            Self::Imperceptible
        } else if delta_e < 2.0 {
            Self::BarelyPerceptible
        } else if delta_e < 10.0 {
            Self::Noticeable
        } else if delta_e < 50.0 {
            Self::Distinct
        } else {
            Self::VeryDistinct
        }
    }
}

//! Color space conversion utilities
//!
//! Provides the one sanctioned path from display colors to CIELAB:
//! - `#RRGGBB` hex strings to 8-bit sRGB
//! - sRGB to CIE XYZ (D65) via inverse gamma and the sRGB matrix
//! - XYZ to CIELAB against the D65 reference white
//!
//! `LabColor` and `XyzColor` have no public constructors; every value is
//! derived from an `RgbColor`, which keeps literal Lab values out of
//! matching code.

use std::fmt;
use std::str::FromStr;

use palette::{white_point::D65, FromColor, Lab, Lch, Srgb};
use serde::{Deserialize, Serialize};

use crate::constants::{cie, d65};
use crate::{EngineError, Result};

/// 8-bit sRGB color
///
/// Serializes as an uppercase `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    /// Create a color from its three channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` or `RRGGBB` string (case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self> {
        hex_to_rgb(hex)
    }

    /// Uppercase `#RRGGBB` representation
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to CIE XYZ (D65)
    pub fn to_xyz(&self) -> XyzColor {
        rgb_to_xyz(*self)
    }

    /// Convert to CIELAB (D65)
    pub fn to_lab(&self) -> LabColor {
        rgb_to_lab(*self)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        hex_to_rgb(s)
    }
}

impl TryFrom<String> for RgbColor {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        hex_to_rgb(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

impl From<Srgb<u8>> for RgbColor {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<RgbColor> for Srgb<u8> {
    fn from(color: RgbColor) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

/// CIE XYZ tristimulus values on the 0..100 scale (D65)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XyzColor {
    x: f64,
    y: f64,
    z: f64,
}

impl XyzColor {
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Convert to CIELAB against the D65 reference white
    pub fn to_lab(&self) -> LabColor {
        xyz_to_lab(*self)
    }
}

/// CIELAB color (D65)
///
/// L* is in [0, 100]; a* and b* are roughly within [-128, 128] for colors
/// reachable from sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabColor {
    l: f64,
    a: f64,
    b: f64,
}

impl LabColor {
    /// Reference-vector constructor for tests; production values come from RGB.
    #[cfg(test)]
    pub(crate) const fn from_components(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Lightness L*
    pub fn l(&self) -> f64 {
        self.l
    }

    /// Green-red axis a*
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Blue-yellow axis b*
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Chroma C*ab
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle h_ab in degrees [0, 360); 0 for achromatic colors
    pub fn hue_degrees(&self) -> f64 {
        hue_angle(self.a, self.b)
    }

    /// View as a `palette` Lab value
    pub fn to_palette(&self) -> Lab<D65, f64> {
        Lab::new(self.l, self.a, self.b)
    }

    /// Cylindrical LCh representation
    pub fn to_lch(&self) -> Lch<D65, f64> {
        Lch::from_color(self.to_palette())
    }
}

/// Parse a hex color matching `#?[0-9A-Fa-f]{6}`
///
/// # Errors
///
/// Returns `InvalidHexFormat` for anything else, including 3-digit shorthand
/// and surrounding whitespace.
pub fn hex_to_rgb(hex: &str) -> Result<RgbColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(EngineError::invalid_hex(hex));
    }

    let channel = |start: usize| {
        u8::from_str_radix(&digits[start..start + 2], 16).map_err(|_| EngineError::invalid_hex(hex))
    };

    Ok(RgbColor::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Convert 8-bit sRGB to XYZ (D65, 0..100 scale)
///
/// Channels are normalized to [0, 1], linearized with the piecewise sRGB
/// inverse gamma, then multiplied by the sRGB→XYZ matrix.
pub fn rgb_to_xyz(rgb: RgbColor) -> XyzColor {
    let linear = [
        srgb_to_linear(rgb.r),
        srgb_to_linear(rgb.g),
        srgb_to_linear(rgb.b),
    ];

    let row = |m: [f64; 3]| 100.0 * (m[0] * linear[0] + m[1] * linear[1] + m[2] * linear[2]);

    XyzColor {
        x: row(d65::SRGB_TO_XYZ[0]),
        y: row(d65::SRGB_TO_XYZ[1]),
        z: row(d65::SRGB_TO_XYZ[2]),
    }
}

/// Convert XYZ (D65) to CIELAB
pub fn xyz_to_lab(xyz: XyzColor) -> LabColor {
    let [xn, yn, zn] = d65::WHITE_POINT_XYZ;

    let fx = lab_f(xyz.x / xn);
    let fy = lab_f(xyz.y / yn);
    let fz = lab_f(xyz.z / zn);

    LabColor {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert 8-bit sRGB straight to CIELAB
pub fn rgb_to_lab(rgb: RgbColor) -> LabColor {
    xyz_to_lab(rgb_to_xyz(rgb))
}

/// Hue angle in degrees [0, 360); defined as 0 when both axes are zero
pub(crate) fn hue_angle(a: f64, b: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= cie::SRGB_LINEAR_KNEE {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > cie::EPSILON {
        t.cbrt()
    } else {
        (cie::KAPPA * t + 16.0) / 116.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_lab(lab: LabColor, expected: (f64, f64, f64), tolerance: f64) {
        assert!(
            (lab.l() - expected.0).abs() < tolerance
                && (lab.a() - expected.1).abs() < tolerance
                && (lab.b() - expected.2).abs() < tolerance,
            "got {:?}, expected {:?}",
            lab,
            expected
        );
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#D4A574").unwrap(), RgbColor::new(0xD4, 0xA5, 0x74));
        assert_eq!(hex_to_rgb("d4a574").unwrap(), RgbColor::new(0xD4, 0xA5, 0x74));
        assert_eq!(hex_to_rgb("#000000").unwrap(), RgbColor::new(0, 0, 0));
    }

    #[test]
    fn test_hex_to_rgb_invalid() {
        let inputs = [
            "", "#", "#FFF", "#FFFFFFF", "#GGGGGG", "##FFFFFF", " #FFFFFF", "+FFFFF", "#ff ff0",
        ];
        for input in inputs {
            match hex_to_rgb(input) {
                Err(EngineError::InvalidHexFormat { input: rejected }) => {
                    assert_eq!(rejected, input)
                }
                other => panic!("expected InvalidHexFormat for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_to_hex_uppercase() {
        assert_eq!(RgbColor::new(255, 0, 171).to_hex(), "#FF00AB");
        assert_eq!(hex_to_rgb("#abcdef").unwrap().to_string(), "#ABCDEF");
    }

    #[test]
    fn test_rgb_serde_as_hex() {
        let color = RgbColor::new(0xD4, 0xA6, 0x74);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#D4A674\"");

        let parsed: RgbColor = serde_json::from_str("\"d4a674\"").unwrap();
        assert_eq!(parsed, color);

        assert!(serde_json::from_str::<RgbColor>("\"#XYZ123\"").is_err());
    }

    #[test]
    fn test_white_xyz() {
        let xyz = rgb_to_xyz(RgbColor::new(255, 255, 255));
        assert!((xyz.x() - 95.047).abs() < 1e-3);
        assert!((xyz.y() - 100.0).abs() < 1e-3);
        assert!((xyz.z() - 108.883).abs() < 1e-3);
    }

    #[test]
    fn test_white_lab() {
        assert_lab(rgb_to_lab(RgbColor::new(255, 255, 255)), (100.0, 0.0, 0.0), 1e-3);
    }

    #[test]
    fn test_black_lab() {
        assert_lab(rgb_to_lab(RgbColor::new(0, 0, 0)), (0.0, 0.0, 0.0), 1e-9);
    }

    #[test]
    fn test_primary_lab_values() {
        assert_lab(rgb_to_lab(RgbColor::new(255, 0, 0)), (53.2408, 80.0925, 67.2032), 1e-2);
        assert_lab(rgb_to_lab(RgbColor::new(0, 255, 0)), (87.7347, -86.1827, 83.1793), 1e-2);
        assert_lab(rgb_to_lab(RgbColor::new(0, 0, 255)), (32.2970, 79.1875, -107.8602), 1e-2);
    }

    #[test]
    fn test_gray_is_achromatic() {
        let lab = rgb_to_lab(RgbColor::new(128, 128, 128));
        assert!(lab.a().abs() < 1e-3);
        assert!(lab.b().abs() < 1e-3);
        assert!(lab.chroma() < 1e-3);
    }

    #[test]
    fn test_dark_channel_uses_linear_segment() {
        // 10/255 sits below the sRGB knee
        let lab = rgb_to_lab(RgbColor::new(10, 10, 10));
        assert!(lab.l() > 0.0 && lab.l() < 5.0);
    }

    #[test]
    fn test_agrees_with_palette() {
        for rgb in [
            RgbColor::new(0xD4, 0xA5, 0x74),
            RgbColor::new(0x8B, 0x6F, 0x56),
            RgbColor::new(0x3B, 0x22, 0x19),
            RgbColor::new(0xF1, 0xC2, 0x7D),
        ] {
            let ours = rgb.to_lab();
            let srgb: Srgb<f64> = Srgb::<u8>::from(rgb).into_format();
            let theirs: Lab<D65, f64> = Lab::from_color(srgb);
            assert!((ours.l() - theirs.l).abs() < 0.05, "{}: L {} vs {}", rgb, ours.l(), theirs.l);
            assert!((ours.a() - theirs.a).abs() < 0.05, "{}: a {} vs {}", rgb, ours.a(), theirs.a);
            assert!((ours.b() - theirs.b).abs() < 0.05, "{}: b {} vs {}", rgb, ours.b(), theirs.b);
        }
    }

    #[test]
    fn test_lch_view() {
        let lab = rgb_to_lab(RgbColor::new(0xD4, 0xA5, 0x74));
        let lch = lab.to_lch();
        assert!((lch.l - lab.l()).abs() < 1e-9);
        assert!((lch.chroma - lab.chroma()).abs() < 1e-9);
        assert!((lch.hue.into_positive_degrees() - lab.hue_degrees()).abs() < 1e-6);
    }

    #[test]
    fn test_hue_angle_quadrants() {
        assert!((hue_angle(1.0, 0.0) - 0.0).abs() < 1e-12);
        assert!((hue_angle(0.0, 1.0) - 90.0).abs() < 1e-12);
        assert!((hue_angle(-1.0, 0.0) - 180.0).abs() < 1e-12);
        assert!((hue_angle(0.0, -1.0) - 270.0).abs() < 1e-12);
        assert_eq!(hue_angle(0.0, -0.0), 0.0);
        assert_eq!(hue_angle(-0.0, -0.0), 0.0);
    }
}

//! Color conversion and perceptual difference module
//!
//! This module handles hex/sRGB parsing, the sRGB → XYZ → CIELAB pipeline
//! and the ΔE76 / CIEDE2000 color difference formulas.

pub mod conversion;
pub mod distance;

pub use conversion::{hex_to_rgb, rgb_to_lab, rgb_to_xyz, xyz_to_lab, LabColor, RgbColor, XyzColor};
pub use distance::{delta_e, delta_e2000, delta_e76, DeltaECategory, DeltaEMethod};

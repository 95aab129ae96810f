//! # Shade Match
//!
//! A Rust crate for skin tone analysis and perceptual foundation shade matching.
//!
//! This library provides:
//! - sRGB → XYZ → CIELAB conversion under D65 and CIEDE2000 color difference
//! - Robust skin tone sampling from RGBA frames with confidence metrics
//! - Rule-based depth and undertone classification
//! - Ranked catalog matching with an undertone compatibility penalty
//!
//! ## Example
//!
//! ```rust
//! use shade_match::{MatchingEngine, ShadeCatalog, ShadeRecord};
//!
//! let catalog = ShadeCatalog::from_records(vec![
//!     ShadeRecord::new("Fenty", "Pro Filt'r", "220", "#D4A674"),
//!     ShadeRecord::new("NARS", "Sheer Glow", "Medium 2", "#8B6F56"),
//! ]);
//! let engine = MatchingEngine::with_defaults(catalog);
//!
//! let matches = engine.match_hex("#D4A574", Some(1), None)?;
//! let best = &matches[0];
//! println!("{} {}: ΔE {:.2}", best.shade.brand(), best.shade.shade_name(), best.delta_e);
//! # Ok::<(), shade_match::EngineError>(())
//! ```

pub mod analysis;
pub mod catalog;
pub mod color;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod image_loader;

pub use analysis::{
    DepthBucket, PixelSource, Rgba, RgbaBuffer, SkinToneAnalysis, SkinToneAnalyzer, ToneClassifier,
    ToneReading, UndertoneCategory,
};
pub use catalog::{MatchResult, ShadeCatalog, ShadeEntry, ShadeMatcher, ShadeRecord, UndertoneTag};
pub use color::{delta_e2000, delta_e76, hex_to_rgb, rgb_to_lab, DeltaEMethod, LabColor, RgbColor};
pub use config::EngineConfig;
pub use engine::{MatchingEngine, Recommendation};
pub use error::{EngineError, Result};

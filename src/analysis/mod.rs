//! Skin tone analysis module
//!
//! This module handles pixel access, robust skin tone sampling, face region
//! averages and depth/undertone classification.

pub mod analyzer;
pub mod classifier;
pub mod pixels;
pub mod regions;
pub mod sampler;

pub use analyzer::{SkinToneAnalysis, SkinToneAnalyzer, ToneReading};
pub use classifier::{
    depth_level, DepthBucket, DepthRule, ToneClassification, ToneClassifier, UndertoneCategory,
    UndertoneLabel, UndertoneRule,
};
pub use pixels::{PixelSource, Rgba, RgbaBuffer};
pub use regions::{FaceRegion, RegionBox, RegionSample, RegionSampler};
pub use sampler::{SampledTone, SkinSampler, ToneSample};

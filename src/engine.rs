//! Matching engine
//!
//! Owns a catalog and the configured analyzer and matcher. There is no
//! global state: build one engine per catalog and share it by reference.
//! All queries take `&self`.

use log::debug;
use serde::Serialize;

use crate::analysis::{PixelSource, SkinToneAnalysis, SkinToneAnalyzer, UndertoneCategory};
use crate::catalog::{MatchResult, ShadeCatalog, ShadeMatcher};
use crate::color::{hex_to_rgb, LabColor};
use crate::config::EngineConfig;
use crate::Result;

/// Skin analysis together with the shades matching its dominant tone
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    pub analysis: SkinToneAnalysis,
    pub matches: Vec<MatchResult<'a>>,
}

/// Skin tone analysis and shade matching over one catalog
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    catalog: ShadeCatalog,
    config: EngineConfig,
    analyzer: SkinToneAnalyzer,
    matcher: ShadeMatcher,
}

impl MatchingEngine {
    /// Create an engine
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration fails validation.
    pub fn new(catalog: ShadeCatalog, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        debug!("engine ready with {} catalog entries", catalog.len());
        Ok(Self {
            analyzer: SkinToneAnalyzer::from_config(&config),
            matcher: ShadeMatcher::with_config(config.matching.clone()),
            catalog,
            config,
        })
    }

    /// Create an engine with default configuration
    pub fn with_defaults(catalog: ShadeCatalog) -> Self {
        let config = EngineConfig::default();
        Self {
            analyzer: SkinToneAnalyzer::from_config(&config),
            matcher: ShadeMatcher::with_config(config.matching.clone()),
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &ShadeCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &SkinToneAnalyzer {
        &self.analyzer
    }

    /// Match a `#RRGGBB` color against the catalog
    ///
    /// # Errors
    ///
    /// Returns `InvalidHexFormat` for a malformed color.
    pub fn match_hex(
        &self,
        hex: &str,
        limit: Option<usize>,
        hint: Option<UndertoneCategory>,
    ) -> Result<Vec<MatchResult<'_>>> {
        let lab = hex_to_rgb(hex)?.to_lab();
        Ok(self.match_color(&lab, limit, hint))
    }

    pub fn match_color(
        &self,
        target: &LabColor,
        limit: Option<usize>,
        hint: Option<UndertoneCategory>,
    ) -> Vec<MatchResult<'_>> {
        self.matcher.find_matches(target, self.catalog.entries(), limit, hint)
    }

    pub fn analyze<P: PixelSource + ?Sized>(&self, pixels: &P) -> Result<SkinToneAnalysis> {
        self.analyzer.analyze(pixels)
    }

    /// Analyze a frame and match its dominant tone
    ///
    /// The dominant tone's undertone family is used as the matching hint.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientSamples` if the frame has too few skin pixels.
    pub fn recommend<P: PixelSource + ?Sized>(
        &self,
        pixels: &P,
        limit: Option<usize>,
    ) -> Result<Recommendation<'_>> {
        self.recommend_with_hint(pixels, limit, None)
    }

    /// Like [`recommend`](Self::recommend), with an explicit undertone hint
    ///
    /// `None` falls back to the dominant tone's undertone family.
    pub fn recommend_with_hint<P: PixelSource + ?Sized>(
        &self,
        pixels: &P,
        limit: Option<usize>,
        hint: Option<UndertoneCategory>,
    ) -> Result<Recommendation<'_>> {
        let analysis = self.analyze(pixels)?;
        let hint = hint.unwrap_or(analysis.dominant.undertone.category);
        let matches = self.match_color(&analysis.dominant.lab, limit, Some(hint));
        Ok(Recommendation { analysis, matches })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Rgba, RgbaBuffer};
    use crate::catalog::ShadeRecord;
    use crate::EngineError;

    fn engine() -> MatchingEngine {
        MatchingEngine::with_defaults(ShadeCatalog::from_records(vec![
            ShadeRecord::new("Fenty", "Pro Filt'r", "220", "#D4A674"),
            ShadeRecord::new("NARS", "Sheer Glow", "Medium 2", "#8B6F56"),
            ShadeRecord::new("Generic", "Tint", "Rosy Ivory", "#F3D0C8"),
        ]))
    }

    #[test]
    fn test_match_hex() {
        let engine = engine();
        let matches = engine.match_hex("#d4a574", Some(1), None).unwrap();
        assert_eq!(matches[0].shade.brand(), "Fenty");
        assert!(matches[0].delta_e < 3.0);
    }

    #[test]
    fn test_match_hex_invalid() {
        assert!(matches!(
            engine().match_hex("D4A5", None, None),
            Err(EngineError::InvalidHexFormat { .. })
        ));
    }

    #[test]
    fn test_recommend_uses_dominant_tone() {
        let engine = engine();
        let frame = RgbaBuffer::filled(80, 80, Rgba::opaque(0xD4, 0xA5, 0x74));
        let recommendation = engine.recommend(&frame, Some(2)).unwrap();

        assert_eq!(recommendation.analysis.dominant.hex, "#D4A574");
        assert_eq!(recommendation.matches.len(), 2);
        assert_eq!(recommendation.matches[0].shade.brand(), "Fenty");
        assert!(recommendation.matches[0].undertone_compatible);
    }

    #[test]
    fn test_recommend_hint_override() {
        let engine = engine();
        let frame = RgbaBuffer::filled(80, 80, Rgba::opaque(0xD4, 0xA5, 0x74));

        let dominant = engine.recommend(&frame, None).unwrap();
        let fallback = engine.recommend_with_hint(&frame, None, None).unwrap();
        assert_eq!(dominant.matches.len(), fallback.matches.len());
        for (a, b) in dominant.matches.iter().zip(&fallback.matches) {
            assert_eq!(a.shade.id(), b.shade.id());
            assert_eq!(a.score, b.score);
        }

        // A cool hint penalizes the warm-inferred Fenty shade
        let cool = engine
            .recommend_with_hint(&frame, None, Some(UndertoneCategory::Cool))
            .unwrap();
        let fenty = cool.matches.iter().find(|m| m.shade.brand() == "Fenty").unwrap();
        assert!(!fenty.undertone_compatible);
        assert!((fenty.score - fenty.delta_e - 5.0).abs() < 1e-12);
        let ivory = cool.matches.iter().find(|m| m.shade.brand() == "Generic").unwrap();
        assert!(ivory.undertone_compatible);
    }

    #[test]
    fn test_recommend_insufficient_samples() {
        let frame = RgbaBuffer::filled(20, 20, Rgba::opaque(30, 200, 40));
        assert!(matches!(
            engine().recommend(&frame, None),
            Err(EngineError::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.matching.match_scale = 0.0;
        assert!(matches!(
            MatchingEngine::new(ShadeCatalog::default(), config),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_empty_catalog() {
        let engine = MatchingEngine::new(ShadeCatalog::default(), EngineConfig::default()).unwrap();
        assert!(engine.match_hex("#C09070", None, None).unwrap().is_empty());
    }
}

//! Depth and undertone classification
//!
//! Both classifications are ordered first-match-wins rule lists held as
//! data, so a policy can be inspected, tested and replaced without touching
//! control flow.
//!
//! The default undertone rules overlap (for example a*=4, b*=11 satisfies
//! both warm rules); rule order decides, and changing it changes results.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::LabColor;
use crate::constants::tone;

/// Qualitative undertone family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndertoneCategory {
    Warm,
    Cool,
    Neutral,
    Olive,
}

impl UndertoneCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UndertoneCategory::Warm => "warm",
            UndertoneCategory::Cool => "cool",
            UndertoneCategory::Neutral => "neutral",
            UndertoneCategory::Olive => "olive",
        }
    }
}

impl fmt::Display for UndertoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative lightness bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthBucket {
    /// Very light
    Fair,
    Light,
    Medium,
    /// Tan / deep
    Deep,
    VeryDeep,
}

impl DepthBucket {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            DepthBucket::Fair => "Very Light",
            DepthBucket::Light => "Light",
            DepthBucket::Medium => "Medium",
            DepthBucket::Deep => "Tan/Deep",
            DepthBucket::VeryDeep => "Very Deep",
        }
    }
}

/// Undertone family plus a finer descriptor such as "Peach/Golden"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UndertoneLabel {
    pub category: UndertoneCategory,
    pub descriptor: &'static str,
}

/// Lightness threshold for one depth bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRule {
    pub min_lightness: f64,
    pub bucket: DepthBucket,
}

/// One undertone rule; `predicate` receives (a*, b*)
#[derive(Debug, Clone, Copy)]
pub struct UndertoneRule {
    pub predicate: fn(f64, f64) -> bool,
    pub label: UndertoneLabel,
}

impl UndertoneRule {
    pub const fn new(
        predicate: fn(f64, f64) -> bool,
        category: UndertoneCategory,
        descriptor: &'static str,
    ) -> Self {
        Self {
            predicate,
            label: UndertoneLabel { category, descriptor },
        }
    }
}

/// Depth rules, checked in order; darker colors fall through to very deep
pub const DEPTH_RULES: &[DepthRule] = &[
    DepthRule {
        min_lightness: tone::FAIR_MIN_LIGHTNESS,
        bucket: DepthBucket::Fair,
    },
    DepthRule {
        min_lightness: tone::LIGHT_MIN_LIGHTNESS,
        bucket: DepthBucket::Light,
    },
    DepthRule {
        min_lightness: tone::MEDIUM_MIN_LIGHTNESS,
        bucket: DepthBucket::Medium,
    },
    DepthRule {
        min_lightness: tone::DEEP_MIN_LIGHTNESS,
        bucket: DepthBucket::Deep,
    },
];

/// Bucket for colors below every depth rule
pub const DEPTH_FALLBACK: DepthBucket = DepthBucket::VeryDeep;

/// Undertone rules on (a*, b*), checked in order
pub const UNDERTONE_RULES: &[UndertoneRule] = &[
    UndertoneRule::new(|a, b| a > 3.0 && b > 10.0, UndertoneCategory::Warm, "Peach/Golden"),
    UndertoneRule::new(
        |a, b| b > 12.0 && a.abs() <= 5.0,
        UndertoneCategory::Warm,
        "Golden/Yellow",
    ),
    UndertoneRule::new(|a, b| a > 5.0 && b <= 10.0, UndertoneCategory::Cool, "Rosy/Pink"),
    UndertoneRule::new(|a, b| a < 0.0 && b > 8.0, UndertoneCategory::Olive, "Olive"),
    UndertoneRule::new(
        |a, b| a.abs() <= 5.0 && b.abs() <= 10.0,
        UndertoneCategory::Neutral,
        "Neutral",
    ),
    UndertoneRule::new(|a, b| a < -3.0 && b < 5.0, UndertoneCategory::Cool, "Ash/Gray"),
];

/// Label for colors no undertone rule matches
pub const UNDERTONE_FALLBACK: UndertoneLabel = UndertoneLabel {
    category: UndertoneCategory::Neutral,
    descriptor: "Neutral",
};

/// Combined classification of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToneClassification {
    pub depth: DepthBucket,
    pub depth_level: u8,
    pub undertone: UndertoneLabel,
}

/// Rule-driven tone classifier
#[derive(Debug, Clone)]
pub struct ToneClassifier {
    depth_rules: Cow<'static, [DepthRule]>,
    undertone_rules: Cow<'static, [UndertoneRule]>,
}

impl Default for ToneClassifier {
    fn default() -> Self {
        Self {
            depth_rules: Cow::Borrowed(DEPTH_RULES),
            undertone_rules: Cow::Borrowed(UNDERTONE_RULES),
        }
    }
}

impl ToneClassifier {
    /// Classifier with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with a replacement policy
    pub fn with_rules(depth_rules: Vec<DepthRule>, undertone_rules: Vec<UndertoneRule>) -> Self {
        Self {
            depth_rules: Cow::Owned(depth_rules),
            undertone_rules: Cow::Owned(undertone_rules),
        }
    }

    pub fn classify(&self, lab: &LabColor) -> ToneClassification {
        ToneClassification {
            depth: self.classify_depth(lab.l()),
            depth_level: depth_level(lab),
            undertone: self.classify_undertone(lab.a(), lab.b()),
        }
    }

    pub fn classify_depth(&self, lightness: f64) -> DepthBucket {
        self.depth_rules
            .iter()
            .find(|rule| lightness >= rule.min_lightness)
            .map_or(DEPTH_FALLBACK, |rule| rule.bucket)
    }

    pub fn classify_undertone(&self, a: f64, b: f64) -> UndertoneLabel {
        self.undertone_rules
            .iter()
            .find(|rule| (rule.predicate)(a, b))
            .map_or(UNDERTONE_FALLBACK, |rule| rule.label)
    }
}

/// Position on the 1 (lightest) to 10 (deepest) catalog depth scale
pub fn depth_level(lab: &LabColor) -> u8 {
    let level = ((100.0 - lab.l()) / tone::DEPTH_LEVEL_STEP).ceil();
    level.clamp(1.0, 10.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RgbColor;

    fn undertone(a: f64, b: f64) -> UndertoneLabel {
        ToneClassifier::new().classify_undertone(a, b)
    }

    #[test]
    fn test_depth_thresholds() {
        let classifier = ToneClassifier::new();
        assert_eq!(classifier.classify_depth(95.0), DepthBucket::Fair);
        assert_eq!(classifier.classify_depth(80.0), DepthBucket::Fair);
        assert_eq!(classifier.classify_depth(79.9), DepthBucket::Light);
        assert_eq!(classifier.classify_depth(65.0), DepthBucket::Light);
        assert_eq!(classifier.classify_depth(50.0), DepthBucket::Medium);
        assert_eq!(classifier.classify_depth(35.0), DepthBucket::Deep);
        assert_eq!(classifier.classify_depth(34.9), DepthBucket::VeryDeep);
        assert_eq!(classifier.classify_depth(0.0), DepthBucket::VeryDeep);
    }

    #[test]
    fn test_undertone_rules() {
        assert_eq!(undertone(8.0, 20.0).descriptor, "Peach/Golden");
        assert_eq!(undertone(2.0, 15.0).descriptor, "Golden/Yellow");
        assert_eq!(undertone(9.0, 6.0).descriptor, "Rosy/Pink");
        assert_eq!(undertone(-2.0, 10.0).category, UndertoneCategory::Olive);
        assert_eq!(undertone(1.0, 3.0).category, UndertoneCategory::Neutral);
        assert_eq!(undertone(-6.0, -12.0).descriptor, "Ash/Gray");
        // No rule matches: far blue with slight red
        assert_eq!(undertone(4.0, -20.0), UNDERTONE_FALLBACK);
    }

    #[test]
    fn test_overlapping_warm_rules_first_wins() {
        // Matches both warm rules; the first one decides
        let label = undertone(4.0, 11.0);
        assert_eq!(label.category, UndertoneCategory::Warm);
        assert_eq!(label.descriptor, "Peach/Golden");

        // Outside rule one, inside rule two
        assert_eq!(undertone(3.0, 13.0).descriptor, "Golden/Yellow");
    }

    #[test]
    fn test_neutral_before_ash() {
        // |a| <= 5 and |b| <= 10 is checked before the ash rule
        assert_eq!(undertone(-4.0, 0.0).category, UndertoneCategory::Neutral);
        assert_eq!(undertone(-6.0, 0.0).descriptor, "Ash/Gray");
    }

    #[test]
    fn test_swapped_policy() {
        let classifier = ToneClassifier::with_rules(
            vec![DepthRule { min_lightness: 50.0, bucket: DepthBucket::Light }],
            vec![UndertoneRule::new(|_, b| b > 0.0, UndertoneCategory::Warm, "Any Yellow")],
        );
        assert_eq!(classifier.classify_depth(60.0), DepthBucket::Light);
        assert_eq!(classifier.classify_depth(40.0), DepthBucket::VeryDeep);
        assert_eq!(classifier.classify_undertone(-20.0, 1.0).descriptor, "Any Yellow");
        assert_eq!(classifier.classify_undertone(0.0, -1.0), UNDERTONE_FALLBACK);
    }

    #[test]
    fn test_classify_skin_color() {
        let lab = RgbColor::new(0xD4, 0xA5, 0x74).to_lab();
        let result = ToneClassifier::new().classify(&lab);
        assert_eq!(result.depth, DepthBucket::Light);
        assert_eq!(result.undertone.category, UndertoneCategory::Warm);
        assert_eq!(result.depth_level, 4);
    }

    #[test]
    fn test_depth_level_range() {
        assert_eq!(depth_level(&RgbColor::new(255, 255, 255).to_lab()), 1);
        assert_eq!(depth_level(&RgbColor::new(0, 0, 0).to_lab()), 10);
        let deep = depth_level(&RgbColor::new(0x3B, 0x22, 0x19).to_lab());
        assert!((8..=10).contains(&deep));
    }

    #[test]
    fn test_labels() {
        assert_eq!(DepthBucket::Deep.label(), "Tan/Deep");
        assert_eq!(UndertoneCategory::Olive.to_string(), "olive");
        assert!(DepthBucket::Fair < DepthBucket::VeryDeep);
    }
}

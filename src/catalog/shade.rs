//! Shade catalog records
//!
//! [`ShadeRecord`] is the loose row handed over by the product store;
//! [`ShadeEntry`] is the validated, immutable form the matcher scans. Lab
//! coordinates are computed once when an entry is built.
//!
//! Missing attributes are filled in by [`infer_attributes`] and nowhere
//! else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{depth_level, ToneClassifier, UndertoneCategory};
use crate::color::{hex_to_rgb, LabColor, RgbColor};
use crate::{EngineError, Result};

/// Undertone tag as used by cosmetic catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndertoneTag {
    Warm,
    Cool,
    Neutral,
    Olive,
    Golden,
    Yellow,
    Peach,
    Pink,
}

impl UndertoneTag {
    /// Parse a tag name (case-insensitive); common synonyms are accepted
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "warm" | "w" => Some(Self::Warm),
            "cool" | "c" => Some(Self::Cool),
            "neutral" | "n" => Some(Self::Neutral),
            "olive" | "o" => Some(Self::Olive),
            "golden" | "gold" => Some(Self::Golden),
            "yellow" => Some(Self::Yellow),
            "peach" => Some(Self::Peach),
            "pink" | "rosy" | "rose" | "red" => Some(Self::Pink),
            _ => None,
        }
    }

    /// Undertone family this tag belongs to
    pub fn category(&self) -> UndertoneCategory {
        match self {
            Self::Warm | Self::Golden | Self::Yellow | Self::Peach => UndertoneCategory::Warm,
            Self::Cool | Self::Pink => UndertoneCategory::Cool,
            Self::Neutral => UndertoneCategory::Neutral,
            Self::Olive => UndertoneCategory::Olive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Neutral => "neutral",
            Self::Olive => "olive",
            Self::Golden => "golden",
            Self::Yellow => "yellow",
            Self::Peach => "peach",
            Self::Pink => "pink",
        }
    }
}

impl From<UndertoneCategory> for UndertoneTag {
    fn from(category: UndertoneCategory) -> Self {
        match category {
            UndertoneCategory::Warm => Self::Warm,
            UndertoneCategory::Cool => Self::Cool,
            UndertoneCategory::Neutral => Self::Neutral,
            UndertoneCategory::Olive => Self::Olive,
        }
    }
}

impl fmt::Display for UndertoneTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Foundation coverage level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Sheer,
    Light,
    Medium,
    Full,
}

impl Coverage {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sheer" => Some(Self::Sheer),
            "light" => Some(Self::Light),
            "medium" => Some(Self::Medium),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Where an entry attribute came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSource {
    /// Supplied on the record
    Explicit,
    /// Parsed from the shade name
    ShadeName,
    /// Parsed from the product description
    Description,
    /// Derived from the shade color
    Color,
}

/// Catalog row as supplied by the product store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadeRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub brand: String,
    #[serde(alias = "product")]
    pub product_name: String,
    #[serde(alias = "shade")]
    pub shade_name: String,
    pub hex: String,
    #[serde(default)]
    pub undertone: Option<String>,
    #[serde(default)]
    pub depth_level: Option<u8>,
    #[serde(default)]
    pub coverage: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ShadeRecord {
    pub fn new(
        brand: impl Into<String>,
        product_name: impl Into<String>,
        shade_name: impl Into<String>,
        hex: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            product_name: product_name.into(),
            shade_name: shade_name.into(),
            hex: hex.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_undertone(mut self, undertone: impl Into<String>) -> Self {
        self.undertone = Some(undertone.into());
        self
    }

    pub fn with_depth_level(mut self, level: u8) -> Self {
        self.depth_level = Some(level);
        self
    }

    pub fn with_coverage(mut self, coverage: impl Into<String>) -> Self {
        self.coverage = Some(coverage.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Attributes resolved for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferredAttributes {
    pub undertone: UndertoneTag,
    pub undertone_source: AttributeSource,
    pub depth_level: u8,
    pub coverage: Option<Coverage>,
}

/// Resolve undertone, depth level and coverage for a record
///
/// Each attribute takes the first available source:
///
/// - undertone: the record's tag, then a keyword or shade code in the shade
///   name (`"Warm Beige"`, `"2N1"`, `"W3"`), then the undertone classified
///   from the shade's Lab color
/// - depth level: the record's value, then the 1-10 scale derived from L*
/// - coverage: the record's value, then a coverage phrase in the
///   description (`"full coverage"`, `"sheer"`), otherwise unknown
///
/// Unparseable explicit values fall through to the next source.
pub fn infer_attributes(record: &ShadeRecord, lab: &LabColor) -> InferredAttributes {
    let (undertone, undertone_source) = if let Some(tag) =
        record.undertone.as_deref().and_then(UndertoneTag::parse)
    {
        (tag, AttributeSource::Explicit)
    } else if let Some(tag) = undertone_from_shade_name(&record.shade_name) {
        (tag, AttributeSource::ShadeName)
    } else {
        let label = ToneClassifier::default().classify_undertone(lab.a(), lab.b());
        (UndertoneTag::from(label.category), AttributeSource::Color)
    };

    let coverage = record
        .coverage
        .as_deref()
        .and_then(Coverage::parse)
        .or_else(|| record.description.as_deref().and_then(coverage_from_description));

    InferredAttributes {
        undertone,
        undertone_source,
        depth_level: record.depth_level.unwrap_or_else(|| depth_level(lab)),
        coverage,
    }
}

/// Keyword (`warm`, `pink`, ...) or shade code (`2N1`, `W3`, `220C`) in a shade name
fn undertone_from_shade_name(name: &str) -> Option<UndertoneTag> {
    let lower = name.to_ascii_lowercase();
    let tokens = lower.split(|c: char| !c.is_ascii_alphanumeric()).filter(|t| !t.is_empty());

    for token in tokens {
        if token.len() > 1 && token.chars().all(|c| c.is_ascii_alphabetic()) {
            if let Some(tag) = UndertoneTag::parse(token) {
                return Some(tag);
            }
            continue;
        }

        // Shade code: digits around exactly one undertone letter
        let mut letters = token.chars().filter(|c| c.is_ascii_alphabetic());
        let has_digit = token.chars().any(|c| c.is_ascii_digit());
        if let (Some(letter), None, true) = (letters.next(), letters.next(), has_digit) {
            let tag = match letter {
                'w' => Some(UndertoneTag::Warm),
                'c' => Some(UndertoneTag::Cool),
                'n' => Some(UndertoneTag::Neutral),
                'o' => Some(UndertoneTag::Olive),
                _ => None,
            };
            if tag.is_some() {
                return tag;
            }
        }
    }
    None
}

fn coverage_from_description(description: &str) -> Option<Coverage> {
    let text = description.to_ascii_lowercase().replace('-', " ");
    [
        ("full coverage", Coverage::Full),
        ("medium coverage", Coverage::Medium),
        ("light coverage", Coverage::Light),
        ("sheer", Coverage::Sheer),
    ]
    .into_iter()
    .find(|(phrase, _)| text.contains(phrase))
    .map(|(_, coverage)| coverage)
}

/// Validated catalog entry with cached Lab coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadeEntry {
    id: String,
    brand: String,
    product_name: String,
    shade_name: String,
    #[serde(rename = "hex")]
    rgb: RgbColor,
    lab: LabColor,
    undertone: UndertoneTag,
    undertone_source: AttributeSource,
    depth_level: u8,
    coverage: Option<Coverage>,
}

impl ShadeEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn shade_name(&self) -> &str {
        &self.shade_name
    }

    pub fn rgb(&self) -> RgbColor {
        self.rgb
    }

    pub fn hex(&self) -> String {
        self.rgb.to_hex()
    }

    /// Lab coordinates computed when the entry was built
    pub fn lab(&self) -> &LabColor {
        &self.lab
    }

    pub fn undertone(&self) -> UndertoneTag {
        self.undertone
    }

    pub fn undertone_source(&self) -> AttributeSource {
        self.undertone_source
    }

    pub fn depth_level(&self) -> u8 {
        self.depth_level
    }

    pub fn coverage(&self) -> Option<Coverage> {
        self.coverage
    }
}

impl TryFrom<ShadeRecord> for ShadeEntry {
    type Error = EngineError;

    /// # Errors
    ///
    /// `InvalidHexFormat` for a malformed color; `InvalidParameter` for a
    /// depth level outside 1-10.
    fn try_from(record: ShadeRecord) -> Result<Self> {
        let rgb = hex_to_rgb(&record.hex)?;
        if let Some(level) = record.depth_level {
            if !(1..=10).contains(&level) {
                return Err(EngineError::invalid_parameter("depth_level", level));
            }
        }

        let lab = rgb.to_lab();
        let attributes = infer_attributes(&record, &lab);
        let id = record.id.unwrap_or_else(|| {
            format!("{}/{}/{}", record.brand, record.product_name, record.shade_name)
        });

        Ok(Self {
            id,
            brand: record.brand,
            product_name: record.product_name,
            shade_name: record.shade_name,
            rgb,
            lab,
            undertone: attributes.undertone,
            undertone_source: attributes.undertone_source,
            depth_level: attributes.depth_level,
            coverage: attributes.coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(record: ShadeRecord) -> ShadeEntry {
        ShadeEntry::try_from(record).unwrap()
    }

    #[test]
    fn test_entry_caches_lab() {
        let shade = entry(ShadeRecord::new("Fenty", "Pro Filt'r", "220", "#d4a674"));
        assert_eq!(shade.hex(), "#D4A674");
        assert_eq!(*shade.lab(), RgbColor::new(0xD4, 0xA6, 0x74).to_lab());
        assert_eq!(shade.id(), "Fenty/Pro Filt'r/220");
    }

    #[test]
    fn test_invalid_hex_rejected() {
        let err = ShadeEntry::try_from(ShadeRecord::new("X", "Y", "Z", "#12345")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidHexFormat { .. }));
    }

    #[test]
    fn test_invalid_depth_level_rejected() {
        let record = ShadeRecord::new("X", "Y", "Z", "#C09070").with_depth_level(11);
        assert!(matches!(
            ShadeEntry::try_from(record),
            Err(EngineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_explicit_undertone_wins() {
        let shade =
            entry(ShadeRecord::new("B", "P", "Warm Ivory", "#F1C27D").with_undertone("Cool"));
        assert_eq!(shade.undertone(), UndertoneTag::Cool);
        assert_eq!(shade.undertone_source(), AttributeSource::Explicit);
    }

    #[test]
    fn test_undertone_from_shade_name() {
        let cases = [
            ("Warm Beige", UndertoneTag::Warm),
            ("Golden Tan", UndertoneTag::Golden),
            ("Rosy Fair", UndertoneTag::Pink),
            ("2N1 Neutral Sand", UndertoneTag::Neutral),
            ("W3", UndertoneTag::Warm),
            ("220C", UndertoneTag::Cool),
            ("1O0", UndertoneTag::Olive),
        ];
        for (name, expected) in cases {
            let shade = entry(ShadeRecord::new("B", "P", name, "#C09070"));
            assert_eq!(shade.undertone(), expected, "shade name {:?}", name);
            assert_eq!(shade.undertone_source(), AttributeSource::ShadeName);
        }
    }

    #[test]
    fn test_undertone_from_color() {
        // Unknown explicit tag and no hint in the name
        let record = ShadeRecord::new("NARS", "Sheer Glow", "Medium 2", "#8B6F56");
        let shade = entry(record.with_undertone("mystery"));
        assert_eq!(shade.undertone_source(), AttributeSource::Color);
        assert_eq!(shade.undertone(), UndertoneTag::Warm);
    }

    #[test]
    fn test_depth_level() {
        let derived = entry(ShadeRecord::new("B", "P", "S", "#8B6F56"));
        assert_eq!(derived.depth_level(), 7);

        let explicit = entry(ShadeRecord::new("B", "P", "S", "#8B6F56").with_depth_level(6));
        assert_eq!(explicit.depth_level(), 6);
    }

    #[test]
    fn test_coverage_inference() {
        let explicit = entry(ShadeRecord::new("B", "P", "S", "#C09070").with_coverage("Full"));
        assert_eq!(explicit.coverage(), Some(Coverage::Full));

        let described = entry(
            ShadeRecord::new("B", "P", "S", "#C09070")
                .with_description("A lightweight, buildable medium-coverage formula"),
        );
        assert_eq!(described.coverage(), Some(Coverage::Medium));

        let sheer =
            entry(ShadeRecord::new("B", "P", "S", "#C09070").with_description("Sheer skin tint"));
        assert_eq!(sheer.coverage(), Some(Coverage::Sheer));

        let unknown =
            entry(ShadeRecord::new("B", "P", "S", "#C09070").with_description("Lightweight glow"));
        assert_eq!(unknown.coverage(), None);
    }

    #[test]
    fn test_record_deserialize_aliases() {
        let record: ShadeRecord = serde_json::from_str(
            r##"{"brand": "Fenty", "product": "Pro Filt'r", "shade": "220", "hex": "#D4A674"}"##,
        )
        .unwrap();
        assert_eq!(record.product_name, "Pro Filt'r");
        assert_eq!(record.shade_name, "220");
        assert!(record.undertone.is_none());
    }

    #[test]
    fn test_entry_serializes_hex() {
        let shade = entry(ShadeRecord::new("B", "P", "S", "#c09070").with_id("sku-1"));
        let json = serde_json::to_value(&shade).unwrap();
        assert_eq!(json["id"], "sku-1");
        assert_eq!(json["hex"], "#C09070");
        assert_eq!(json["undertone"], "warm");
    }

    #[test]
    fn test_tag_families() {
        assert_eq!(UndertoneTag::Golden.category(), UndertoneCategory::Warm);
        assert_eq!(UndertoneTag::Peach.category(), UndertoneCategory::Warm);
        assert_eq!(UndertoneTag::Pink.category(), UndertoneCategory::Cool);
        assert_eq!(UndertoneTag::parse(" ROSY "), Some(UndertoneTag::Pink));
        assert_eq!(UndertoneTag::parse("beige"), None);
    }
}

//! Shade catalog module
//!
//! This module handles catalog records, attribute inference and ranked
//! shade matching. The catalog is read-only once built.

pub mod matcher;
pub mod shade;

pub use matcher::{undertone_compatible, MatchResult, ShadeMatcher};
pub use shade::{
    infer_attributes, AttributeSource, Coverage, InferredAttributes, ShadeEntry, ShadeRecord,
    UndertoneTag,
};

use std::path::Path;

use log::{debug, warn};

use crate::{EngineError, Result};

/// Validated, immutable collection of shades
#[derive(Debug, Clone, Default)]
pub struct ShadeCatalog {
    entries: Vec<ShadeEntry>,
    rejected: usize,
}

impl ShadeCatalog {
    /// Build a catalog, skipping records that fail validation
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ShadeRecord>,
    {
        let mut entries = Vec::new();
        let mut rejected = 0;

        for record in records {
            let label = format!("{} {} {}", record.brand, record.product_name, record.shade_name);
            match ShadeEntry::try_from(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("skipping catalog record {}: {}", label, e);
                    rejected += 1;
                }
            }
        }

        debug!("catalog built: {} entries, {} rejected", entries.len(), rejected);
        Self { entries, rejected }
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<ShadeRecord> = serde_json::from_str(json)
            .map_err(|e| EngineError::catalog("Invalid catalog JSON", e))?;
        Ok(Self::from_records(records))
    }

    /// Load a JSON array of records from disk
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::catalog(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    pub fn entries(&self) -> &[ShadeEntry] {
        &self.entries
    }

    /// Records skipped during construction
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShadeEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ShadeEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }
}

impl FromIterator<ShadeEntry> for ShadeCatalog {
    fn from_iter<I: IntoIterator<Item = ShadeEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            rejected: 0,
        }
    }
}

impl<'a> IntoIterator for &'a ShadeCatalog {
    type Item = &'a ShadeEntry;
    type IntoIter = std::slice::Iter<'a, ShadeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

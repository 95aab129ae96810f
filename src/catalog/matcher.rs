//! Catalog shade matching
//!
//! Ranks catalog entries by perceptual distance to a target color. An
//! optional undertone hint adds a fixed ΔE penalty to incompatible entries
//! instead of excluding them, so an excellent cross-undertone color fit
//! can still surface.
//!
//! Ordering is by (score, catalog index). Large catalogs are scanned in
//! parallel shards whose local top-N lists merge under the same key, so
//! both paths return identical results.

use std::cmp::Ordering;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use super::shade::{ShadeEntry, UndertoneTag};
use crate::analysis::classifier::UndertoneCategory;
use crate::color::{delta_e, delta_e76, LabColor};
use crate::config::MatchConfig;

/// One ranked catalog match
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    pub shade: &'a ShadeEntry,
    /// Raw perceptual distance to the target
    pub delta_e: f64,
    /// Ranking key: `delta_e` plus any undertone penalty
    pub score: f64,
    /// 0-100, derived from the raw distance
    pub match_percentage: f64,
    pub undertone_compatible: bool,
}

/// Whether a shade's undertone suits a requested undertone family
///
/// Symmetric over families: equal families, either side neutral, or the
/// warm/olive pair.
pub fn undertone_compatible(hint: UndertoneCategory, tag: UndertoneTag) -> bool {
    use UndertoneCategory::*;

    match (hint, tag.category()) {
        (a, b) if a == b => true,
        (Neutral, _) | (_, Neutral) => true,
        (Warm, Olive) | (Olive, Warm) => true,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    delta_e: f64,
    score: f64,
    compatible: bool,
}

fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    a.score.total_cmp(&b.score).then(a.index.cmp(&b.index))
}

/// Top-N shade matcher
#[derive(Debug, Clone, Default)]
pub struct ShadeMatcher {
    config: MatchConfig,
}

impl ShadeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Rank `catalog` against `target` and return the best `limit` entries
    ///
    /// `limit` defaults to `default_limit`. An empty catalog or a zero limit
    /// yields an empty list.
    pub fn find_matches<'a>(
        &self,
        target: &LabColor,
        catalog: &'a [ShadeEntry],
        limit: Option<usize>,
        hint: Option<UndertoneCategory>,
    ) -> Vec<MatchResult<'a>> {
        let limit = limit.unwrap_or(self.config.default_limit);
        if limit == 0 || catalog.is_empty() {
            return Vec::new();
        }

        let mut ranked = if catalog.len() >= self.config.parallel_threshold {
            self.scan_parallel(target, catalog, limit, hint)
        } else {
            self.scan_shard(target, catalog, 0, limit, hint)
        };
        ranked.sort_by(rank);
        ranked.truncate(limit);

        debug!(
            "matched {} of {} catalog entries, best ΔE {:?}",
            ranked.len(),
            catalog.len(),
            ranked.first().map(|c| c.delta_e)
        );

        ranked
            .into_iter()
            .map(|candidate| MatchResult {
                shade: &catalog[candidate.index],
                delta_e: candidate.delta_e,
                score: candidate.score,
                match_percentage: self.match_percentage(candidate.delta_e),
                undertone_compatible: candidate.compatible,
            })
            .collect()
    }

    /// Map a ΔE to a 0-100 match percentage; strictly decreasing
    ///
    /// A non-positive scale degenerates to 100 for an exact match and 0
    /// otherwise.
    pub fn match_percentage(&self, delta_e: f64) -> f64 {
        let delta_e = delta_e.max(0.0);
        let scale = self.config.match_scale;
        if scale.is_nan() || scale <= 0.0 {
            return if delta_e == 0.0 { 100.0 } else { 0.0 };
        }
        100.0 * (-delta_e / scale).exp()
    }

    fn scan_parallel(
        &self,
        target: &LabColor,
        catalog: &[ShadeEntry],
        limit: usize,
        hint: Option<UndertoneCategory>,
    ) -> Vec<Candidate> {
        let shard_size = catalog.len().div_ceil(rayon::current_num_threads()).max(1);
        debug!("scanning {} entries in shards of {}", catalog.len(), shard_size);

        catalog
            .par_chunks(shard_size)
            .enumerate()
            .flat_map_iter(|(shard, entries)| {
                self.scan_shard(target, entries, shard * shard_size, limit, hint)
            })
            .collect()
    }

    /// Score one contiguous shard and keep its local top-N
    fn scan_shard(
        &self,
        target: &LabColor,
        entries: &[ShadeEntry],
        offset: usize,
        limit: usize,
        hint: Option<UndertoneCategory>,
    ) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| match self.config.prune_delta_e76 {
                Some(bound) => delta_e76(target, entry.lab()) <= bound,
                None => true,
            })
            .map(|(i, entry)| {
                let distance = delta_e(self.config.method, target, entry.lab());
                let compatible = hint.map_or(true, |h| undertone_compatible(h, entry.undertone()));
                let penalty = if compatible { 0.0 } else { self.config.undertone_penalty };
                Candidate {
                    index: offset + i,
                    delta_e: distance,
                    score: distance + penalty,
                    compatible,
                }
            })
            .collect();

        candidates.sort_by(rank);
        candidates.truncate(limit);
        candidates
    }
}

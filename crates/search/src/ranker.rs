//! Study ranking against a whole game
//!
//! This module provides:
//! - QuerySequence: the encoded positions of a user's game
//! - RelevanceAccumulator: per-chapter hit aggregation for one call
//! - StudyRanker: runs the matcher for every ply and ranks chapters
//!
//! # Ranking
//!
//! Chapters are ordered by the number of distinct game plies they matched
//! (descending), then by the mean matched distance (ascending). Breadth
//! of coverage across the game outranks closeness at a single ply.
//! Chapters still tied keep the order in which they were first hit.

use crate::encoder::PositionEncoder;
use crate::index::CorpusIndex;
use crate::matcher::{find_closest, find_closest_parallel};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use studymatch_core::{
    EncodingError, Error, RankedEntry, RankingConfig, Result, SearchStats, SectionKey,
};
use tracing::debug;

// ============================================================================
// QuerySequence
// ============================================================================

/// Encoded positions of one game; index i is the position after i half-moves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySequence {
    plies: Vec<String>,
}

impl QuerySequence {
    /// Encode every snapshot of a game
    ///
    /// # Errors
    ///
    /// The first snapshot that fails to encode.
    pub fn from_snapshots<S: AsRef<str>>(
        encoder: &PositionEncoder,
        snapshots: &[S],
    ) -> std::result::Result<Self, EncodingError> {
        let plies = snapshots
            .iter()
            .map(|s| encoder.encode(s.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(QuerySequence { plies })
    }

    /// Wrap already encoded positions
    pub fn from_encoded(plies: Vec<String>) -> Self {
        QuerySequence { plies }
    }

    /// Encoded positions in game order
    pub fn plies(&self) -> &[String] {
        &self.plies
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        self.plies.len()
    }

    /// Whether the game has no positions
    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }
}

// ============================================================================
// RelevanceAccumulator
// ============================================================================

/// Hits collected for one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRelevance {
    /// The chapter
    pub key: SectionKey,
    /// Every matched distance, in hit order
    pub distances: Vec<usize>,
    /// Query plies that produced a hit
    pub matched_plies: BTreeSet<usize>,
}

impl SectionRelevance {
    fn to_entry(&self) -> RankedEntry {
        let total: usize = self.distances.iter().sum();
        RankedEntry {
            document_id: self.key.document_id.clone(),
            section_id: self.key.section_id.clone(),
            average_distance: total as f64 / self.distances.len() as f64,
            distinct_ply_matches: self.matched_plies.len(),
            total_close_references: self.distances.len(),
            annotation_text: None,
        }
    }
}

/// Per-chapter aggregation for one ranking call
///
/// Entries are kept in first-hit order; the map only locates them.
/// Built fresh for each call and never shared.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelevanceAccumulator {
    entries: Vec<SectionRelevance>,
    #[serde(skip)]
    slots: FxHashMap<SectionKey, usize>,
}

impl RelevanceAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that query ply `ply` hit `key` at `distance`
    pub fn record(&mut self, key: SectionKey, ply: usize, distance: usize) {
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.slots.insert(key.clone(), slot);
                self.entries.push(SectionRelevance {
                    key,
                    distances: Vec::new(),
                    matched_plies: BTreeSet::new(),
                });
                slot
            }
        };
        let entry = &mut self.entries[slot];
        entry.distances.push(distance);
        entry.matched_plies.insert(ply);
    }

    /// Hits for one chapter
    pub fn get(&self, key: &SectionKey) -> Option<&SectionRelevance> {
        self.slots.get(key).map(|&slot| &self.entries[slot])
    }

    /// All chapters, in first-hit order
    pub fn entries(&self) -> &[SectionRelevance] {
        &self.entries
    }

    /// Number of chapters hit
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was hit
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One ranked entry per chapter, best first
    pub fn into_ranked(self) -> Vec<RankedEntry> {
        let mut ranked: Vec<RankedEntry> = self.entries.iter().map(SectionRelevance::to_entry).collect();
        // stable: chapters tied on both keys stay in first-hit order
        ranked.sort_by(|a, b| {
            b.distinct_ply_matches
                .cmp(&a.distinct_ply_matches)
                .then_with(|| a.average_distance.total_cmp(&b.average_distance))
        });
        ranked
    }
}

// ============================================================================
// StudyRanker
// ============================================================================

/// Ranks corpus chapters against a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRanker {
    top_n_ply_matches: usize,
    parallel_scan: bool,
}

impl Default for StudyRanker {
    fn default() -> Self {
        StudyRanker {
            top_n_ply_matches: 1,
            parallel_scan: false,
        }
    }
}

impl StudyRanker {
    /// Create a ranker considering the `top_n_ply_matches` closest corpus
    /// positions for each ply
    pub fn new(top_n_ply_matches: usize) -> Self {
        StudyRanker {
            top_n_ply_matches,
            parallel_scan: false,
        }
    }

    /// Create a ranker from configuration
    pub fn from_config(config: &RankingConfig) -> Self {
        StudyRanker {
            top_n_ply_matches: config.top_n_ply_matches,
            parallel_scan: config.parallel_scan,
        }
    }

    /// Builder: split each per-ply scan across the rayon pool
    pub fn with_parallel_scan(mut self, enabled: bool) -> Self {
        self.parallel_scan = enabled;
        self
    }

    /// Closest corpus positions considered per ply
    pub fn top_n_ply_matches(&self) -> usize {
        self.top_n_ply_matches
    }

    /// Rank chapters against the game, best first
    ///
    /// An empty game or corpus gives an empty list.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` when `top_n_ply_matches` is 0;
    /// `Error::IncompatibleEncoding` when a query position's length differs
    /// from the corpus encoding length.
    pub fn rank(&self, query: &QuerySequence, corpus: &CorpusIndex) -> Result<Vec<RankedEntry>> {
        let (accumulator, _) = self.accumulate(query, corpus)?;
        Ok(accumulator.into_ranked())
    }

    /// Run the matcher for every ply and collect hits per chapter
    pub fn accumulate(
        &self,
        query: &QuerySequence,
        corpus: &CorpusIndex,
    ) -> Result<(RelevanceAccumulator, SearchStats)> {
        if self.top_n_ply_matches == 0 {
            return Err(Error::invalid_input("top_n_ply_matches must be at least 1"));
        }

        let start = Instant::now();
        let mut accumulator = RelevanceAccumulator::new();
        let mut skipped = 0;
        let mut scanned = 0;

        if let Some(expected) = corpus.encoded_len() {
            for (ply, encoded) in query.plies().iter().enumerate() {
                if encoded.is_empty() {
                    skipped += 1;
                    continue;
                }
                let found = encoded.chars().count();
                if found != expected {
                    return Err(Error::IncompatibleEncoding {
                        expected,
                        found,
                        context: format!("query ply {}", ply),
                    });
                }

                let hits = if self.parallel_scan {
                    find_closest_parallel(encoded, corpus, self.top_n_ply_matches)
                } else {
                    find_closest(encoded, corpus, self.top_n_ply_matches)
                };
                scanned += corpus.len();
                for hit in hits {
                    accumulator.record(hit.record.section_key(), ply, hit.distance);
                }
            }
        }

        let elapsed = start.elapsed().as_micros() as u64;
        debug!(
            target: "studymatch::rank",
            plies = query.len(),
            skipped,
            sections = accumulator.len(),
            elapsed_us = elapsed,
            "Ranked game"
        );

        let stats = SearchStats::new(query.len(), scanned)
            .with_skipped(skipped)
            .with_elapsed(elapsed);
        Ok((accumulator, stats))
    }
}

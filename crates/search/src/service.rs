//! Study search facade
//!
//! This module provides:
//! - StudySearch: owns the shared corpus and answers position and game queries
//! - ClosestResponse / StudySearchResponse: results plus execution stats
//!
//! # Flow
//!
//! ```text
//! game snapshots ──► PositionEncoder ──► QuerySequence
//!                                            │
//!                         StudyRanker ◄──────┘
//!                   (matcher once per ply)
//!                             │
//!                   attach_annotations (top N)
//!                             │
//!                             ▼
//!                   StudySearchResponse
//! ```
//!
//! # Stateless Design
//!
//! StudySearch holds only `Arc` references to immutable data. Clones share
//! the corpus; every call builds and drops its own accumulator, so calls
//! may run concurrently on any thread.

use crate::annotations::{attach_annotations, AnnotationMap};
use crate::encoder::PositionEncoder;
use crate::index::CorpusIndex;
use crate::matcher::{find_closest, find_closest_parallel};
use crate::ranker::{QuerySequence, StudyRanker};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use studymatch_core::{
    Error, MoveSequenceSource, PositionMatch, RankedEntry, Result, SearchStats, StudyMatchConfig,
};
use tracing::{debug, warn};

// ============================================================================
// Responses
// ============================================================================

/// Closest corpus positions to one query position
#[derive(Debug, Clone, Serialize)]
pub struct ClosestResponse {
    /// Encoded query
    pub query: String,
    /// Matches, closest first
    pub matches: Vec<PositionMatch>,
    /// Execution statistics
    pub stats: SearchStats,
}

/// Ranked chapters for one game
#[derive(Debug, Clone, Serialize)]
pub struct StudySearchResponse {
    /// Top chapters, best first, with annotation text attached
    pub entries: Vec<RankedEntry>,
    /// Chapters hit before truncation to the requested count
    pub total_sections: usize,
    /// Execution statistics
    pub stats: SearchStats,
}

// ============================================================================
// StudySearch
// ============================================================================

/// Position-similarity search over a shared study corpus
#[derive(Debug, Clone)]
pub struct StudySearch {
    corpus: Arc<CorpusIndex>,
    annotations: Option<Arc<AnnotationMap>>,
    encoder: PositionEncoder,
    ranker: StudyRanker,
    parallel_scan: bool,
    study_url_base: String,
}

impl StudySearch {
    /// Create a search over `corpus` using configured encoder and ranking
    pub fn new(corpus: Arc<CorpusIndex>, config: &StudyMatchConfig) -> Self {
        StudySearch {
            corpus,
            annotations: None,
            encoder: PositionEncoder::from_config(&config.encoder),
            ranker: StudyRanker::from_config(&config.ranking),
            parallel_scan: config.ranking.parallel_scan,
            study_url_base: config.ranking.study_url_base.clone(),
        }
    }

    /// Builder: attach chapter text to ranked results
    pub fn with_annotations(mut self, annotations: Arc<AnnotationMap>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Builder: consider `n` closest corpus positions per ply
    pub fn with_top_n_ply_matches(mut self, n: usize) -> Self {
        self.ranker = StudyRanker::new(n).with_parallel_scan(self.parallel_scan);
        self
    }

    /// The shared corpus
    pub fn corpus(&self) -> &Arc<CorpusIndex> {
        &self.corpus
    }

    /// The encoder applied to query snapshots
    pub fn encoder(&self) -> &PositionEncoder {
        &self.encoder
    }

    /// Link to a ranked entry's study
    pub fn study_url(&self, entry: &RankedEntry) -> String {
        entry.study_url(&self.study_url_base)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Closest corpus positions to one board snapshot
    ///
    /// # Errors
    ///
    /// Encoding failure of the snapshot, or an encoding whose length does
    /// not match the corpus.
    pub fn closest_positions(&self, snapshot: &str, k: usize) -> Result<ClosestResponse> {
        let encoded = self.encoder.encode(snapshot)?;
        self.closest_encoded(encoded, k)
    }

    /// Closest corpus positions to an already encoded position
    pub fn closest_encoded(&self, encoded: String, k: usize) -> Result<ClosestResponse> {
        let start = Instant::now();
        self.check_length(&encoded, "closest query")?;

        let scored = if self.parallel_scan {
            find_closest_parallel(&encoded, &self.corpus, k)
        } else {
            find_closest(&encoded, &self.corpus, k)
        };
        let matches = scored.iter().map(|s| s.to_match()).collect();
        let scanned = if encoded.is_empty() { 0 } else { self.corpus.len() };
        let stats = SearchStats::new(1, scanned)
            .with_skipped(usize::from(encoded.is_empty()))
            .with_elapsed(start.elapsed().as_micros() as u64);

        Ok(ClosestResponse {
            query: encoded,
            matches,
            stats,
        })
    }

    /// Rank chapters against a game given as board snapshots
    ///
    /// Returns at most `top_n` entries, each with annotation text attached
    /// (empty when none is known).
    ///
    /// # Errors
    ///
    /// Encoding failure of any snapshot, or a ranking invariant violation.
    pub fn rank_game<S: AsRef<str>>(&self, snapshots: &[S], top_n: usize) -> Result<StudySearchResponse> {
        let query = QuerySequence::from_snapshots(&self.encoder, snapshots)?;
        self.rank_query(&query, top_n)
    }

    /// Rank chapters against an encoded game
    pub fn rank_query(&self, query: &QuerySequence, top_n: usize) -> Result<StudySearchResponse> {
        let start = Instant::now();
        let (accumulator, stats) = self.ranker.accumulate(query, &self.corpus)?;
        let total_sections = accumulator.len();
        let entries = attach_annotations(
            accumulator.into_ranked(),
            top_n,
            self.annotations.as_deref(),
        );

        debug!(
            target: "studymatch::rank",
            plies = query.len(),
            total_sections,
            returned = entries.len(),
            "Game ranked"
        );

        Ok(StudySearchResponse {
            entries,
            total_sections,
            stats: stats.with_elapsed(start.elapsed().as_micros() as u64),
        })
    }

    /// Rank chapters against the first game of a PGN text
    ///
    /// A game that stops replaying partway is ranked on the positions
    /// reached before the failure.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if the text holds no game.
    pub fn rank_pgn(
        &self,
        source: &dyn MoveSequenceSource,
        pgn: &str,
        top_n: usize,
    ) -> Result<StudySearchResponse> {
        let game = source
            .first_game(pgn)
            .ok_or_else(|| Error::invalid_input("no game found in PGN text"))?;
        if let Some(failure) = &game.failure {
            warn!(
                target: "studymatch::rank",
                error = %failure,
                positions = game.snapshots.len(),
                "Game replayed partially"
            );
        }
        self.rank_game(&game.snapshots, top_n)
    }

    fn check_length(&self, encoded: &str, context: &str) -> Result<()> {
        let found = encoded.chars().count();
        match self.corpus.encoded_len() {
            Some(expected) if found != 0 && found != expected => {
                Err(Error::IncompatibleEncoding {
                    expected,
                    found,
                    context: context.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

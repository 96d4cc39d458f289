//! Core search types for study retrieval
//!
//! This module defines the result types emitted by the search layer:
//! - PositionMatch: one corpus position close to a query position
//! - RankedEntry: one study chapter ranked against a whole game
//! - SearchStats: execution statistics for debugging/monitoring
//!
//! Downstream formatting (prompt documents, API bodies) is the caller's concern.

use crate::types::{DocumentId, PositionRecord, SectionId, SectionKey};
use serde::{Deserialize, Serialize};

// ============================================================================
// PositionMatch
// ============================================================================

/// A corpus position and its edit distance to a query position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionMatch {
    /// Levenshtein distance to the query
    pub distance: usize,
    /// The matched corpus record
    pub record: PositionRecord,
}

// ============================================================================
// RankedEntry
// ============================================================================

/// One study chapter ranked against a user's game
///
/// Ordering is by `distinct_ply_matches` descending, then
/// `average_distance` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Owning study
    pub document_id: DocumentId,

    /// Chapter within the study
    pub section_id: SectionId,

    /// Mean of every matched distance for this chapter
    pub average_distance: f64,

    /// Unique query plies that hit this chapter
    pub distinct_ply_matches: usize,

    /// All hits, including several top-K slots for one ply
    pub total_close_references: usize,

    /// Human-authored chapter text, set once annotations are attached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_text: Option<String>,
}

impl RankedEntry {
    /// Composite key of the ranked chapter
    pub fn section_key(&self) -> SectionKey {
        SectionKey {
            document_id: self.document_id.clone(),
            section_id: self.section_id.clone(),
        }
    }

    /// Link to the study under the given base URL
    ///
    /// ```
    /// use studymatch_core::{DocumentId, RankedEntry, SectionId};
    ///
    /// let entry = RankedEntry {
    ///     document_id: DocumentId::new("aBcD1234"),
    ///     section_id: SectionId::new("Openings - Chapter 1"),
    ///     average_distance: 2.0,
    ///     distinct_ply_matches: 4,
    ///     total_close_references: 4,
    ///     annotation_text: None,
    /// };
    /// assert_eq!(
    ///     entry.study_url("https://lichess.org/study/"),
    ///     "https://lichess.org/study/aBcD1234"
    /// );
    /// ```
    pub fn study_url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.document_id)
    }
}

// ============================================================================
// SearchStats
// ============================================================================

/// Execution statistics for one search call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Query plies received
    pub plies: usize,

    /// Query plies skipped because they encoded to an empty string
    pub plies_skipped: usize,

    /// Corpus records examined across all plies
    pub candidates_scanned: usize,

    /// Wall time spent (microseconds)
    pub elapsed_micros: u64,
}

impl SearchStats {
    /// Create statistics for a call that examined `candidates_scanned` records
    pub fn new(plies: usize, candidates_scanned: usize) -> Self {
        SearchStats {
            plies,
            plies_skipped: 0,
            candidates_scanned,
            elapsed_micros: 0,
        }
    }

    /// Builder: set skipped plies
    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.plies_skipped = skipped;
        self
    }

    /// Builder: set elapsed time
    pub fn with_elapsed(mut self, micros: u64) -> Self {
        self.elapsed_micros = micros;
        self
    }
}

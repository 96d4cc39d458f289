//! Core types for studymatch
//!
//! This module defines the foundational corpus types:
//! - DocumentId / SectionId: opaque identifiers of a study and one of its chapters
//! - SectionKey: value-typed composite key (document, section)
//! - StudyDocument: one ingested study as produced by the scraper
//! - PositionRecord: one encoded board snapshot of the corpus

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque identifier of a study document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document identifier
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

/// Identifier of a chapter within its study
///
/// Unique within the parent document only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create a section identifier
    pub fn new(id: impl Into<String>) -> Self {
        SectionId(id.into())
    }

    /// Borrow the identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        SectionId(s.to_string())
    }
}

// ============================================================================
// SectionKey
// ============================================================================

/// Composite key identifying one chapter of one study
///
/// Equality is by value. Two records with the same key belong to the
/// same independent move sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey {
    /// Owning study
    pub document_id: DocumentId,
    /// Chapter within the study
    pub section_id: SectionId,
}

impl SectionKey {
    /// Create a new key
    pub fn new(document_id: impl Into<DocumentId>, section_id: impl Into<SectionId>) -> Self {
        SectionKey {
            document_id: document_id.into(),
            section_id: section_id.into(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.document_id, self.section_id)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId(s)
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        SectionId(s)
    }
}

// ============================================================================
// StudyDocument
// ============================================================================

/// One ingested study
///
/// Field names follow the ingestion JSON. Extra scraper fields (author,
/// likes, url) are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDocument {
    /// Unique study identifier
    pub study_id: DocumentId,

    /// Study title, used to build chapter identifiers
    #[serde(default = "default_study_title")]
    pub title: String,

    /// Serialized chapters (multi-game PGN); absent when the export failed
    #[serde(default)]
    pub pgn: Option<String>,
}

fn default_study_title() -> String {
    "Unknown Study".to_string()
}

impl StudyDocument {
    /// Create a study document
    pub fn new(study_id: impl Into<DocumentId>, title: impl Into<String>, pgn: Option<String>) -> Self {
        StudyDocument {
            study_id: study_id.into(),
            title: title.into(),
            pgn,
        }
    }

    /// Serialized chapters, if any non-blank text is present
    pub fn pgn_text(&self) -> Option<&str> {
        self.pgn.as_deref().filter(|s| !s.trim().is_empty())
    }
}

// ============================================================================
// PositionRecord
// ============================================================================

/// One board snapshot from the corpus
///
/// # Invariant
///
/// `encoded` has the same length for every record of one corpus.
/// Identical `encoded` values may belong to different documents
/// (transpositions, common openings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    /// Canonical piece-layout string compared by the matcher
    pub encoded: String,

    /// Owning study
    pub document_id: DocumentId,

    /// Chapter within the study
    pub section_id: SectionId,

    /// Half-moves from the chapter start; 0 is the start position
    pub ply: u32,

    /// Full original snapshot, kept for display only and never compared
    pub raw_state: String,
}

impl PositionRecord {
    /// Composite key of the chapter this record belongs to
    pub fn section_key(&self) -> SectionKey {
        SectionKey {
            document_id: self.document_id.clone(),
            section_id: self.section_id.clone(),
        }
    }
}

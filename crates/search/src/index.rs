//! Corpus index of encoded study positions
//!
//! This module provides:
//! - CorpusIndex: the build-once, read-many record collection
//! - CorpusBuilder: replays and encodes studies into a corpus, in parallel
//! - BuildOutcome / BuildDiagnostic: what was built and which chapters
//!   stopped early
//!
//! # Ordering
//!
//! Records are ordered by document input order, then chapter, then ply,
//! whatever order the workers finish in. The matcher breaks distance ties
//! by this position, so results are reproducible across runs.
//!
//! # Partial failure
//!
//! A chapter that fails to replay or encode keeps the records produced
//! before the failure. The failure is logged and reported as a
//! `BuildDiagnostic`; it never aborts the build.

use crate::encoder::PositionEncoder;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use studymatch_core::{
    EncodingError, Error, IndexConfig, MoveSequenceSource, PositionRecord, ReplayError, Result,
    SectionId, SectionKey, StudyDocument,
};
use thiserror::Error as ThisError;
use tracing::{debug, info, warn};

// ============================================================================
// Diagnostics
// ============================================================================

/// Why a chapter stopped contributing records
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum BuildFailure {
    /// The move sequence stopped replaying
    #[error("{0}")]
    Replay(ReplayError),

    /// A replayed snapshot could not be encoded
    #[error("ply {ply}: {error}")]
    Encoding {
        /// Ply of the offending snapshot
        ply: u32,
        /// Encoder failure
        error: EncodingError,
    },

    /// The replayer produced an empty snapshot
    #[error("ply {ply}: empty snapshot")]
    EmptySnapshot {
        /// Ply of the offending snapshot
        ply: u32,
    },
}

/// A chapter that was indexed only partially
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDiagnostic {
    /// Chapter that failed
    pub key: SectionKey,
    /// Records kept from before the failure
    pub records_kept: usize,
    /// What went wrong
    pub failure: BuildFailure,
}

/// Result of a corpus build
#[derive(Debug)]
pub struct BuildOutcome {
    /// The built corpus
    pub index: CorpusIndex,
    /// One entry per partially indexed chapter
    pub diagnostics: Vec<BuildDiagnostic>,
    /// Documents processed
    pub documents: usize,
    /// Chapters processed, including partial ones
    pub sections: usize,
}

impl BuildOutcome {
    /// Whether every chapter was indexed to its end
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ============================================================================
// CorpusIndex
// ============================================================================

/// Read-only collection of encoded corpus positions
///
/// # Invariant
///
/// Every record's `encoded` has the same length in symbols (`encoded_len`).
///
/// # Thread Safety
///
/// Immutable after construction; share it behind an `Arc` and read it
/// from any number of concurrent ranking calls.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    records: Vec<PositionRecord>,
    encoded_len: Option<usize>,
}

impl CorpusIndex {
    /// Create an empty corpus
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a corpus from already encoded records, keeping their order
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleEncoding` if encoded lengths differ or a
    /// record has an empty encoding.
    pub fn from_records(records: Vec<PositionRecord>) -> Result<Self> {
        let encoded_len = records.first().map(|r| r.encoded.chars().count());
        if let Some(expected) = encoded_len {
            for record in &records {
                let found = record.encoded.chars().count();
                if found != expected || found == 0 {
                    return Err(Error::IncompatibleEncoding {
                        expected,
                        found,
                        context: format!("corpus record {} ply {}", record.section_key(), record.ply),
                    });
                }
            }
        }
        Ok(CorpusIndex {
            records,
            encoded_len,
        })
    }

    /// Every record, in corpus order
    pub fn all_records(&self) -> &[PositionRecord] {
        &self.records
    }

    /// Record at a corpus position
    pub fn get(&self, position: usize) -> Option<&PositionRecord> {
        self.records.get(position)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Symbol count shared by every encoding; `None` for an empty corpus
    pub fn encoded_len(&self) -> Option<usize> {
        self.encoded_len
    }

    /// Number of distinct chapters
    pub fn section_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| (&r.document_id, &r.section_id))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Load records written by `write_records_file`
    ///
    /// # Errors
    ///
    /// I/O, JSON and encoded-length validation failures.
    pub fn load_records_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<PositionRecord> = serde_json::from_str(&content)?;
        let index = Self::from_records(records)?;
        info!(
            target: "studymatch::index",
            path = %path.display(),
            records = index.len(),
            "Loaded corpus records"
        );
        Ok(index)
    }

    /// Write all records as a JSON array
    pub fn write_records_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ============================================================================
// CorpusBuilder
// ============================================================================

/// Records and diagnostics of one document, produced by one worker
#[derive(Debug, Default)]
struct DocumentBatch {
    records: Vec<PositionRecord>,
    diagnostics: Vec<BuildDiagnostic>,
    sections: usize,
}

/// Builds a `CorpusIndex` from ingested studies
///
/// Documents are independent: each worker owns one document and produces
/// its own batch. Batches are merged after all workers finish, in
/// document input order.
pub struct CorpusBuilder<'a> {
    source: &'a dyn MoveSequenceSource,
    encoder: PositionEncoder,
    parallel: bool,
    threads: Option<usize>,
}

impl<'a> CorpusBuilder<'a> {
    /// Create a builder replaying studies with `source`
    pub fn new(source: &'a dyn MoveSequenceSource, encoder: PositionEncoder) -> Self {
        CorpusBuilder {
            source,
            encoder,
            parallel: true,
            threads: None,
        }
    }

    /// Builder: apply index configuration
    pub fn with_config(mut self, config: &IndexConfig) -> Self {
        self.parallel = config.parallel;
        self.threads = config.threads;
        self
    }

    /// Builder: build on a worker pool (default) or the calling thread
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Builder: size of a dedicated worker pool
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Replay, encode and merge every document
    ///
    /// # Errors
    ///
    /// Only for setup faults: a worker pool that cannot be created, or
    /// merged encodings of different lengths (an encoder contract breach).
    pub fn build(&self, documents: &[StudyDocument]) -> Result<BuildOutcome> {
        let start = Instant::now();

        let batches: Vec<DocumentBatch> = if !self.parallel {
            documents.iter().map(|d| self.index_document(d)).collect()
        } else if let Some(threads) = self.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::config(format!("Failed to create worker pool: {}", e)))?;
            pool.install(|| documents.par_iter().map(|d| self.index_document(d)).collect())
        } else {
            documents.par_iter().map(|d| self.index_document(d)).collect()
        };

        let mut records = Vec::with_capacity(batches.iter().map(|b| b.records.len()).sum());
        let mut diagnostics = Vec::new();
        let mut sections = 0;
        for batch in batches {
            records.extend(batch.records);
            diagnostics.extend(batch.diagnostics);
            sections += batch.sections;
        }

        let index = CorpusIndex::from_records(records)?;

        info!(
            target: "studymatch::index",
            documents = documents.len(),
            sections,
            records = index.len(),
            diagnostics = diagnostics.len(),
            source = self.source.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Corpus built"
        );

        Ok(BuildOutcome {
            index,
            diagnostics,
            documents: documents.len(),
            sections,
        })
    }

    fn index_document(&self, document: &StudyDocument) -> DocumentBatch {
        let mut batch = DocumentBatch::default();
        let Some(text) = document.pgn_text() else {
            debug!(target: "studymatch::index", document_id = %document.study_id, "No chapters");
            return batch;
        };

        let mut used_ids = HashSet::new();
        for (i, replay) in self.source.sections(text).into_iter().enumerate() {
            let chapter_number = i + 1;
            let chapter_title = replay
                .title
                .clone()
                .unwrap_or_else(|| format!("Chapter {}", chapter_number));
            let base_id = format!("{} - {}", document.title, chapter_title);
            let mut section_id = base_id.clone();
            let mut suffix = chapter_number;
            while !used_ids.insert(section_id.clone()) {
                section_id = format!("{} ({})", base_id, suffix);
                suffix += 1;
            }
            let key = SectionKey::new(document.study_id.clone(), SectionId::new(section_id));

            let before = batch.records.len();
            let mut failure = replay.failure.clone().map(BuildFailure::Replay);

            for (ply, snapshot) in replay.snapshots.iter().enumerate() {
                let ply = ply as u32;
                match self.encoder.encode(snapshot) {
                    Ok(encoded) if encoded.is_empty() => {
                        failure = Some(BuildFailure::EmptySnapshot { ply });
                        break;
                    }
                    Ok(encoded) => batch.records.push(PositionRecord {
                        encoded,
                        document_id: key.document_id.clone(),
                        section_id: key.section_id.clone(),
                        ply,
                        raw_state: snapshot.clone(),
                    }),
                    Err(error) => {
                        failure = Some(BuildFailure::Encoding { ply, error });
                        break;
                    }
                }
            }

            batch.sections += 1;
            if let Some(failure) = failure {
                let records_kept = batch.records.len() - before;
                warn!(
                    target: "studymatch::index",
                    document_id = %key.document_id,
                    section_id = %key.section_id,
                    records_kept,
                    error = %failure,
                    "Chapter indexed partially"
                );
                batch.diagnostics.push(BuildDiagnostic {
                    key,
                    records_kept,
                    failure,
                });
            }
        }
        batch
    }
}

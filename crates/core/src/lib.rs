//! Core types and traits for studymatch
//!
//! This crate defines the foundational types used throughout the system:
//! - DocumentId / SectionId / SectionKey: identifiers of studies and chapters
//! - StudyDocument: one ingested study
//! - PositionRecord: one encoded board snapshot of the corpus
//! - PositionMatch / RankedEntry / SearchStats: search results
//! - Error: error type hierarchy (EncodingError, ReplayError, Error)
//! - MoveSequenceSource: the game-rules seam consumed by the index and query path
//! - StudyMatchConfig: `studymatch.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod search_types;
pub mod traits;
pub mod types;

pub use config::{
    EncoderConfig, IndexConfig, RankingConfig, StudyMatchConfig, CONFIG_FILE_NAME,
    DEFAULT_STUDY_URL_BASE,
};
pub use error::{EncodingError, Error, ReplayError, Result};
pub use search_types::{PositionMatch, RankedEntry, SearchStats};
pub use traits::{MoveSequenceSource, SectionReplay};
pub use types::{DocumentId, PositionRecord, SectionId, SectionKey, StudyDocument};

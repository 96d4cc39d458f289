//! Position-similarity search over annotated studies
//!
//! This crate provides:
//! - PositionEncoder: board snapshot to fixed-length symbol string
//! - Levenshtein edit distance with a bounded early exit
//! - CorpusBuilder / CorpusIndex: the immutable list of encoded positions
//! - Matcher: top-K closest corpus positions to one query position
//! - StudyRanker: per-chapter aggregation of matches across a whole game
//! - AnnotationMap: chapter text joined onto ranked results
//! - StudySearch: shared facade combining the above
//!
//! # Usage
//!
//! ```ignore
//! use studymatch_search::{CorpusBuilder, PositionEncoder, StudySearch};
//!
//! let outcome = CorpusBuilder::new(&replayer, PositionEncoder::new()).build(&studies)?;
//! let search = StudySearch::new(Arc::new(outcome.index), &config);
//! let response = search.rank_game(&snapshots, 3)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod annotations;
pub mod distance;
pub mod encoder;
pub mod index;
pub mod matcher;
pub mod ranker;
pub mod service;

// Re-export commonly used types
pub use annotations::{attach_annotations, AnnotationMap, AnnotationRecord};
pub use distance::{levenshtein, levenshtein_within, Levenshtein, PositionDistance};
pub use encoder::{encode_position, PositionEncoder, BOARD_SIZE};
pub use index::{BuildDiagnostic, BuildFailure, BuildOutcome, CorpusBuilder, CorpusIndex};
pub use matcher::{find_closest, find_closest_exhaustive, find_closest_parallel, ScoredRecord};
pub use ranker::{QuerySequence, RelevanceAccumulator, SectionRelevance, StudyRanker};
pub use service::{ClosestResponse, StudySearch, StudySearchResponse};

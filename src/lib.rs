//! studymatch - position-similarity retrieval of annotated chess studies
//!
//! Given a played game, studymatch finds the study chapters whose positions
//! most resemble the positions of the game, ranked by how many plies of the
//! game they cover and then by how close they are.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use studymatch::{CorpusBuilder, PositionEncoder, StandardReplayer, StudyMatchConfig, StudySearch};
//!
//! let replayer = StandardReplayer::new();
//! let outcome = CorpusBuilder::new(&replayer, PositionEncoder::new()).build(&studies)?;
//! let search = StudySearch::new(Arc::new(outcome.index), &StudyMatchConfig::default());
//! let response = search.rank_pgn(&replayer, "1. e4 c5 2. Nf3 d6 *", 3)?;
//! ```
//!
//! # Architecture
//!
//! - `studymatch-core`: shared types, errors, configuration
//! - `studymatch-rules`: PGN splitting and move replay (the game-rules collaborator)
//! - `studymatch-search`: encoder, corpus index, matcher, ranker, facade

pub use studymatch_core::*;
pub use studymatch_rules::{split_games, PgnGame, StandardReplayer, STANDARD_START_FEN};
pub use studymatch_search::*;

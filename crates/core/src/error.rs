//! Error types for studymatch
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Failures are split by where they are recovered:
//! - `EncodingError` fails a single encode call
//! - `ReplayError` ends one section's replay but keeps its prefix
//! - `Error` is what crosses a public API boundary

use std::io;
use thiserror::Error;

/// Result type alias for studymatch operations
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// EncodingError
// ============================================================================

/// A board snapshot could not be turned into its canonical string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The piece layout has the wrong number of ranks
    #[error("expected {expected} ranks, found {found}")]
    WrongRankCount {
        /// Ranks required by the board geometry
        expected: usize,
        /// Ranks present in the snapshot
        found: usize,
    },

    /// A rank describes the wrong number of squares
    #[error("rank {rank} describes {found} squares, expected {expected}")]
    WrongSquareCount {
        /// 0-based rank index in snapshot order (top rank first)
        rank: usize,
        /// Squares required per rank
        expected: usize,
        /// Squares described
        found: usize,
    },

    /// A character that is neither a piece letter nor an empty-run digit
    #[error("unrecognized symbol {symbol:?} at offset {offset}")]
    UnrecognizedSymbol {
        /// The offending character
        symbol: char,
        /// Byte offset within the piece-placement field
        offset: usize,
    },
}

// ============================================================================
// ReplayError
// ============================================================================

/// A section's move sequence stopped replaying partway through
///
/// Produced by the game-rules collaborator. Never aborts a corpus build:
/// the snapshots produced before the failure are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// The declared start position could not be set up
    #[error("invalid start position: {0}")]
    InvalidStartPosition(String),

    /// A movetext token is not valid move notation
    #[error("unparsable move {token:?} at ply {ply}")]
    UnparsableMove {
        /// Ply the move would have produced
        ply: usize,
        /// Raw token
        token: String,
    },

    /// A move parsed but is not legal in the current position
    #[error("illegal move {san:?} at ply {ply}")]
    IllegalMove {
        /// Ply the move would have produced
        ply: usize,
        /// Move as written
        san: String,
    },
}

// ============================================================================
// Error
// ============================================================================

/// Error types for studymatch
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed board snapshot
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Move sequence could not be replayed
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),

    /// Encoded strings of different lengths met at query time
    ///
    /// Indicates the encoder or the corpus index broke its contract.
    #[error("incompatible encoding in {context}: expected length {expected}, found {found}")]
    IncompatibleEncoding {
        /// Length fixed by the corpus
        expected: usize,
        /// Offending length
        found: usize,
        /// Where the mismatch was detected
        context: String,
    },

    /// Invalid argument from the caller
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Shorthand for `Error::InvalidInput`
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Shorthand for `Error::Config`
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

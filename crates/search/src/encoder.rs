//! Position encoder
//!
//! Converts a board snapshot (FEN) into the fixed-alphabet string the
//! matcher compares:
//! - piece letters are kept as written (uppercase white, lowercase black)
//! - every empty square becomes one placeholder symbol; run-length
//!   digits are expanded, never kept as counts
//! - side to move, castling, en passant and move counters are dropped
//!
//! Rank separators are optional but must be the same corpus-wide.

use studymatch_core::{EncoderConfig, EncodingError};

/// Squares per rank and ranks per board
pub const BOARD_SIZE: usize = 8;

const PIECE_SYMBOLS: &str = "pnbrqkPNBRQK";

/// Encodes board snapshots into comparable strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionEncoder {
    empty_symbol: char,
    rank_separators: bool,
}

impl Default for PositionEncoder {
    fn default() -> Self {
        PositionEncoder {
            empty_symbol: '.',
            rank_separators: false,
        }
    }
}

impl PositionEncoder {
    /// Create an encoder producing the 64-symbol form with `.` for empty squares
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder from configuration
    ///
    /// The config is expected to have passed `StudyMatchConfig::validate`.
    pub fn from_config(config: &EncoderConfig) -> Self {
        PositionEncoder {
            empty_symbol: config.empty_symbol,
            rank_separators: config.rank_separators,
        }
    }

    /// Builder: keep `/` between ranks
    pub fn with_rank_separators(mut self, enabled: bool) -> Self {
        self.rank_separators = enabled;
        self
    }

    /// Builder: placeholder for empty squares
    ///
    /// # Errors
    ///
    /// `Error::Config` for a symbol that is not printable ASCII or that
    /// collides with board notation.
    pub fn with_empty_symbol(mut self, symbol: char) -> studymatch_core::Result<Self> {
        EncoderConfig::check_empty_symbol(symbol)?;
        self.empty_symbol = symbol;
        Ok(self)
    }

    /// Placeholder for empty squares
    pub fn empty_symbol(&self) -> char {
        self.empty_symbol
    }

    /// Symbols in every non-empty encoding
    pub fn encoded_len(&self) -> usize {
        let separators = if self.rank_separators { BOARD_SIZE - 1 } else { 0 };
        BOARD_SIZE * BOARD_SIZE + separators
    }

    /// Encode the piece layout of a snapshot
    ///
    /// Only the first whitespace-separated field (piece placement) is read.
    /// An empty or blank snapshot encodes to an empty string.
    ///
    /// # Errors
    ///
    /// Returns an `EncodingError` for a wrong rank count, a rank that does
    /// not describe exactly eight squares, or an unknown symbol.
    ///
    /// # Example
    ///
    /// ```
    /// use studymatch_search::encoder::PositionEncoder;
    ///
    /// let encoder = PositionEncoder::new().with_rank_separators(true);
    /// let encoded = encoder
    ///     .encode("r1b1k1nr/p2p1p1p/n5N1/1p1P4/2p3P1/P1P1P3/2P1BP1P/R3K2R b KQkq - 0 22")
    ///     .unwrap();
    /// assert_eq!(encoded, "r.b.k.nr/p..p.p.p/n.....N./.p.P..../..p...P./P.P.P.../..P.BP.P/R...K..R");
    /// ```
    pub fn encode(&self, snapshot: &str) -> Result<String, EncodingError> {
        let Some(placement) = snapshot.split_whitespace().next() else {
            return Ok(String::new());
        };

        let rank_count = placement.split('/').count();
        if rank_count != BOARD_SIZE {
            return Err(EncodingError::WrongRankCount {
                expected: BOARD_SIZE,
                found: rank_count,
            });
        }

        let mut encoded = String::with_capacity(self.encoded_len());
        let mut offset = 0;
        for (rank, rank_text) in placement.split('/').enumerate() {
            if rank > 0 && self.rank_separators {
                encoded.push('/');
            }
            let mut squares = 0;
            for (i, c) in rank_text.char_indices() {
                match c {
                    '1'..='8' => {
                        let run = c as usize - '0' as usize;
                        squares += run;
                        for _ in 0..run {
                            encoded.push(self.empty_symbol);
                        }
                    }
                    c if PIECE_SYMBOLS.contains(c) => {
                        squares += 1;
                        encoded.push(c);
                    }
                    other => {
                        return Err(EncodingError::UnrecognizedSymbol {
                            symbol: other,
                            offset: offset + i,
                        })
                    }
                }
            }
            if squares != BOARD_SIZE {
                return Err(EncodingError::WrongSquareCount {
                    rank,
                    expected: BOARD_SIZE,
                    found: squares,
                });
            }
            offset += rank_text.len() + 1;
        }

        Ok(encoded)
    }
}

/// Encode with the default encoder (64 symbols, `.` for empty squares)
pub fn encode_position(snapshot: &str) -> Result<String, EncodingError> {
    PositionEncoder::default().encode(snapshot)
}

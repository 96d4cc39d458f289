//! Chapter replay with `shakmaty`
//!
//! Turns each PGN game into the FEN snapshot after every half-move.
//! A chapter whose movetext breaks partway keeps the snapshots produced
//! before the break and reports why it stopped.

use crate::pgn::{split_games, PgnGame};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use studymatch_core::{MoveSequenceSource, ReplayError, SectionReplay};
use tracing::debug;

/// FEN of the standard initial position
pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Replays standard-chess PGN chapters
///
/// A `[FEN]` tag sets the start position; a `[Variant]` tag mentioning
/// 960 switches to Chess960 castling.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardReplayer;

impl StandardReplayer {
    /// Create a new replayer
    pub fn new() -> Self {
        StandardReplayer
    }

    /// Replay one parsed game
    pub fn replay_game(&self, game: &PgnGame) -> SectionReplay {
        let title = game
            .header("Event")
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != "?")
            .map(str::to_string);

        let mut pos = match start_position(game) {
            Ok(pos) => pos,
            Err(failure) => {
                return SectionReplay {
                    title,
                    snapshots: Vec::new(),
                    failure: Some(failure),
                }
            }
        };

        let mut snapshots = Vec::with_capacity(game.moves.len() + 1);
        snapshots.push(snapshot(&pos));

        for (i, token) in game.moves.iter().enumerate() {
            let ply = i + 1;
            let san: SanPlus = match token.parse() {
                Ok(san) => san,
                Err(_) => {
                    return stopped(title, snapshots, ReplayError::UnparsableMove {
                        ply,
                        token: token.clone(),
                    })
                }
            };
            let m = match san.san.to_move(&pos) {
                Ok(m) => m,
                Err(_) => {
                    return stopped(title, snapshots, ReplayError::IllegalMove {
                        ply,
                        san: token.clone(),
                    })
                }
            };
            pos.play_unchecked(&m);
            snapshots.push(snapshot(&pos));
        }

        SectionReplay::complete(title, snapshots)
    }
}

impl MoveSequenceSource for StandardReplayer {
    fn sections(&self, text: &str) -> Vec<SectionReplay> {
        let games = split_games(text);
        debug!(target: "studymatch::rules", games = games.len(), "Split PGN");
        games.iter().map(|g| self.replay_game(g)).collect()
    }

    fn name(&self) -> &str {
        "shakmaty-standard"
    }
}

fn stopped(title: Option<String>, snapshots: Vec<String>, failure: ReplayError) -> SectionReplay {
    SectionReplay {
        title,
        snapshots,
        failure: Some(failure),
    }
}

fn castling_mode(game: &PgnGame) -> CastlingMode {
    match game.header("Variant") {
        Some(v) if v.contains("960") => CastlingMode::Chess960,
        _ => CastlingMode::Standard,
    }
}

fn start_position(game: &PgnGame) -> Result<Chess, ReplayError> {
    let Some(fen) = game.header("FEN").map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(Chess::default());
    };
    let parsed: Fen = fen
        .parse()
        .map_err(|e| ReplayError::InvalidStartPosition(format!("{}: {}", fen, e)))?;
    parsed
        .into_position(castling_mode(game))
        .map_err(|e| ReplayError::InvalidStartPosition(format!("{}: {}", fen, e)))
}

fn snapshot(pos: &Chess) -> String {
    Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string()
}

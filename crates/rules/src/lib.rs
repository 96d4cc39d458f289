//! Game-rules collaborator for studymatch
//!
//! This crate provides:
//! - PGN splitting into chapters (headers + mainline SAN tokens)
//! - StandardReplayer: a `MoveSequenceSource` that replays chapters with
//!   `shakmaty` and emits one FEN snapshot per ply
//!
//! Move legality is entirely delegated to `shakmaty`; this crate only
//! decides how notation maps onto moves and how failures are reported.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod pgn;
pub mod replay;

pub use pgn::{split_games, PgnGame};
pub use replay::{StandardReplayer, STANDARD_START_FEN};

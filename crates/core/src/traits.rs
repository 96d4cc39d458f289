//! Core traits for the game-rules seam
//!
//! Move legality and notation parsing live outside the search layer.
//! The corpus index and the query path both consume board snapshots
//! through `MoveSequenceSource`, so one implementation serves both and
//! the encodings stay compatible.

use crate::error::ReplayError;

/// Replayed board snapshots of one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReplay {
    /// Displayed chapter title, when the notation carries one
    pub title: Option<String>,

    /// Full board snapshots (FEN); index 0 is the start position,
    /// index i the position after i half-moves
    pub snapshots: Vec<String>,

    /// Why replay stopped early, if it did
    ///
    /// `snapshots` still holds everything produced before the failure.
    pub failure: Option<ReplayError>,
}

impl SectionReplay {
    /// A fully replayed chapter
    pub fn complete(title: Option<String>, snapshots: Vec<String>) -> Self {
        SectionReplay {
            title,
            snapshots,
            failure: None,
        }
    }

    /// Whether the chapter replayed to its end
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Game-rules collaborator: serialized games in, board snapshots out
///
/// # Thread Safety
///
/// Sources must be Send + Sync; the corpus build calls them from
/// several worker threads at once.
pub trait MoveSequenceSource: Send + Sync {
    /// Replay every chapter of a serialized multi-game text, in order
    fn sections(&self, text: &str) -> Vec<SectionReplay>;

    /// Replay only the first game of the text
    fn first_game(&self, text: &str) -> Option<SectionReplay> {
        self.sections(text).into_iter().next()
    }

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LineSource;

    impl MoveSequenceSource for LineSource {
        fn sections(&self, text: &str) -> Vec<SectionReplay> {
            text.lines()
                .map(|l| SectionReplay::complete(None, vec![l.to_string()]))
                .collect()
        }

        fn name(&self) -> &str {
            "lines"
        }
    }

    #[test]
    fn test_first_game_default() {
        let first = LineSource.first_game("a\nb").unwrap();
        assert_eq!(first.snapshots, vec!["a".to_string()]);
        assert!(first.is_complete());
        assert!(LineSource.first_game("").is_none());
    }
}

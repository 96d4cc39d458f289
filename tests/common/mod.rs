//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;`.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
pub use studymatch::{
    AnnotationMap, AnnotationRecord, CorpusBuilder, CorpusIndex, MoveSequenceSource,
    PositionEncoder, StandardReplayer, StudyDocument, StudyMatchConfig, StudySearch,
};

// ============================================================================
// Fixtures
// ============================================================================

/// A small study collection: two openings, one with two chapters, one
/// study without PGN.
pub fn opening_studies() -> Vec<StudyDocument> {
    vec![
        StudyDocument::new(
            "sicilian01",
            "Sicilian Defence",
            Some(
                "[Event \"Najdorf\"]\n\n1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6 *\n\n\
                 [Event \"Dragon\"]\n\n1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 g6 *"
                    .to_string(),
            ),
        ),
        StudyDocument::new(
            "frenchA1",
            "French Defence",
            Some("[Event \"Winawer\"]\n\n1. e4 e6 2. d4 d5 3. Nc3 Bb4 4. e5 c5 *".to_string()),
        ),
        StudyDocument::new("ghost", "Unexported", None),
        StudyDocument::new(
            "qgd77",
            "Queen's Gambit",
            Some("1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 *".to_string()),
        ),
    ]
}

/// Chapter texts for the fixture collection.
pub fn opening_annotations() -> AnnotationMap {
    AnnotationMap::from_records(vec![
        AnnotationRecord {
            study_id: "sicilian01".into(),
            chapter: "Sicilian Defence - Najdorf".into(),
            text: "Black prepares ...e5 or ...b5.".to_string(),
        },
        AnnotationRecord {
            study_id: "frenchA1".into(),
            chapter: "French Defence - Winawer".into(),
            text: "The pin on c3 defines the fight.".to_string(),
        },
    ])
}

/// Build the fixture corpus with the standard replayer.
pub fn opening_corpus() -> CorpusIndex {
    let replayer = StandardReplayer::new();
    CorpusBuilder::new(&replayer, PositionEncoder::new())
        .build(&opening_studies())
        .expect("fixture corpus builds")
        .index
}

/// Facade over the fixture corpus with annotations attached.
pub fn opening_search() -> StudySearch {
    StudySearch::new(Arc::new(opening_corpus()), &StudyMatchConfig::default())
        .with_annotations(Arc::new(opening_annotations()))
}

/// Board snapshots of the first game in `pgn`.
pub fn snapshots(pgn: &str) -> Vec<String> {
    StandardReplayer::new()
        .first_game(pgn)
        .expect("game present")
        .snapshots
}

/// Write `studies` as the ingestion JSON file.
pub fn write_studies(path: &Path, studies: &[StudyDocument]) {
    let json = serde_json::to_string_pretty(studies).expect("serialize studies");
    std::fs::write(path, json).expect("write studies");
}

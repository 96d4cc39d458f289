//! Corpus build and persistence

use crate::common::*;
use studymatch::{split_games, STANDARD_START_FEN};

#[test]
fn test_fixture_corpus_shape() {
    let corpus = opening_corpus();
    // 11 + 11 + 9 + 9 positions; the study without PGN adds none
    assert_eq!(corpus.len(), 40);
    assert_eq!(corpus.section_count(), 4);
    assert_eq!(corpus.encoded_len(), Some(64));
    assert!(corpus.all_records().iter().all(|r| r.document_id.as_str() != "ghost"));
}

#[test]
fn test_every_chapter_starts_at_ply_zero() {
    let corpus = opening_corpus();
    let starts: Vec<_> = corpus
        .all_records()
        .iter()
        .filter(|r| r.ply == 0)
        .map(|r| (r.section_id.as_str(), r.raw_state.as_str()))
        .collect();
    assert_eq!(starts.len(), 4);
    assert!(starts.iter().all(|(_, fen)| *fen == STANDARD_START_FEN));
    assert_eq!(starts[3].0, "Queen's Gambit - Chapter 1");
}

#[test]
fn test_ingestion_file_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let studies_path = dir.path().join("studies.json");
    let records_path = dir.path().join("records.json");
    write_studies(&studies_path, &opening_studies());

    let content = std::fs::read_to_string(&studies_path).unwrap();
    let studies: Vec<StudyDocument> = serde_json::from_str(&content).unwrap();
    assert_eq!(studies, opening_studies());

    let replayer = StandardReplayer::new();
    let outcome = CorpusBuilder::new(&replayer, PositionEncoder::new())
        .build(&studies)
        .unwrap();
    assert!(outcome.is_complete());
    assert_eq!(outcome.documents, 4);
    assert_eq!(outcome.sections, 4);

    outcome.index.write_records_file(&records_path).unwrap();
    let loaded = CorpusIndex::load_records_file(&records_path).unwrap();
    assert_eq!(loaded.all_records(), outcome.index.all_records());
}

#[test]
fn test_scraper_fields_are_ignored() {
    let json = r#"[{"study_id": "x", "title": "T", "pgn": "1. e4 *", "author": "someone", "likes": 12, "url": "u"},
                   {"study_id": "y"}]"#;
    let studies: Vec<StudyDocument> = serde_json::from_str(json).unwrap();
    assert_eq!(studies[1].title, "Unknown Study");
    assert!(studies[1].pgn_text().is_none());
}

#[test]
fn test_mismatched_records_file_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(
        &path,
        r#"[{"encoded": "....", "document_id": "a", "section_id": "s", "ply": 0, "raw_state": ""},
            {"encoded": "...", "document_id": "a", "section_id": "s", "ply": 1, "raw_state": ""}]"#,
    )
    .unwrap();
    assert!(matches!(
        CorpusIndex::load_records_file(&path),
        Err(studymatch::Error::IncompatibleEncoding { .. })
    ));
}

#[test]
fn test_separator_encoding_corpus() {
    let replayer = StandardReplayer::new();
    let corpus = CorpusBuilder::new(&replayer, PositionEncoder::new().with_rank_separators(true))
        .build(&opening_studies())
        .unwrap()
        .index;
    assert_eq!(corpus.encoded_len(), Some(71));
    assert_eq!(split_games(opening_studies()[0].pgn_text().unwrap()).len(), 2);
}

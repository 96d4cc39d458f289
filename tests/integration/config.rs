//! Configuration driving the pipeline

use crate::common::*;
use std::sync::Arc;
use studymatch::{Error, CONFIG_FILE_NAME};

#[test]
fn test_default_file_parses_to_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    StudyMatchConfig::write_default_if_missing(&path).unwrap();
    assert_eq!(StudyMatchConfig::from_file(&path).unwrap(), StudyMatchConfig::default());
}

#[test]
fn test_separator_config_flows_into_queries() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[encoder]\nrank_separators = true\n\n[ranking]\ntop_n_results = 1\n").unwrap();
    let config = StudyMatchConfig::from_file(&path).unwrap();

    let replayer = StandardReplayer::new();
    let corpus = CorpusBuilder::new(&replayer, PositionEncoder::from_config(&config.encoder))
        .with_config(&config.index)
        .build(&opening_studies())
        .unwrap()
        .index;
    assert_eq!(corpus.encoded_len(), Some(71));

    let search = StudySearch::new(Arc::new(corpus), &config);
    let response = search
        .rank_game(&snapshots("1. e4 e6 2. d4 d5 3. Nc3 *"), config.ranking.top_n_results)
        .unwrap();
    assert_eq!(response.entries.len(), 1);
    assert_eq!(response.entries[0].document_id.as_str(), "frenchA1");
}

#[test]
fn test_mismatched_encoder_config_fails_loudly() {
    let corpus = opening_corpus();
    let mut config = StudyMatchConfig::default();
    config.encoder.rank_separators = true;
    let search = StudySearch::new(Arc::new(corpus), &config);
    assert!(matches!(
        search.rank_game(&snapshots("1. e4 *"), 3),
        Err(Error::IncompatibleEncoding { expected: 64, found: 71, .. })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[ranking]\ntop_n_ply_matches = 0\n").unwrap();
    assert!(matches!(StudyMatchConfig::from_file(&path), Err(Error::Config(_))));
}

//! Ranking a game against the fixture corpus

use crate::common::*;
use std::sync::Arc;
use std::thread;
use studymatch::{find_closest, QuerySequence, StudyRanker};

#[test]
fn test_najdorf_game_ranks_najdorf_first() {
    let search = opening_search();
    let response = search
        .rank_pgn(
            &StandardReplayer::new(),
            "[Event \"Club game\"]\n\n1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6 6. Be3 e5 *",
            3,
        )
        .unwrap();

    let best = &response.entries[0];
    assert_eq!(best.section_id.as_str(), "Sicilian Defence - Najdorf");
    assert_eq!(best.distinct_ply_matches, 13);
    assert_eq!(best.annotation_text.as_deref(), Some("Black prepares ...e5 or ...b5."));
    assert_eq!(search.study_url(best), "https://lichess.org/study/sicilian01");
    assert_eq!(response.stats.plies, 13);
    assert!(response.entries.len() <= 3);
}

#[test]
fn test_wider_per_ply_matches_bring_in_sibling_chapter() {
    let search = opening_search().with_top_n_ply_matches(2);
    let response = search
        .rank_game(&snapshots("1. e4 c5 2. Nf3 d6 3. d4 cxd4 *"), 5)
        .unwrap();
    let chapters: Vec<&str> = response.entries.iter().map(|e| e.section_id.as_str()).collect();
    assert!(chapters.contains(&"Sicilian Defence - Najdorf"));
    assert!(chapters.contains(&"Sicilian Defence - Dragon"));
    // chapters without text still get an empty string
    let dragon = response
        .entries
        .iter()
        .find(|e| e.section_id.as_str() == "Sicilian Defence - Dragon")
        .unwrap();
    assert_eq!(dragon.annotation_text.as_deref(), Some(""));
}

#[test]
fn test_closest_start_position_is_exact() {
    let search = opening_search();
    let response = search.closest_positions(studymatch::STANDARD_START_FEN, 4).unwrap();
    assert_eq!(response.matches.len(), 4);
    assert!(response.matches.iter().all(|m| m.distance == 0 && m.record.ply == 0));
    // ties keep corpus order
    assert_eq!(response.matches[0].record.document_id.as_str(), "sicilian01");
}

#[test]
fn test_unique_position_found_regardless_of_corpus_size() {
    let corpus = opening_corpus();
    let target = corpus
        .all_records()
        .iter()
        .find(|r| r.document_id.as_str() == "frenchA1" && r.ply == 7)
        .unwrap()
        .encoded
        .clone();
    let results = find_closest(&target, &corpus, 1);
    assert_eq!(results[0].distance, 0);
    assert_eq!(results[0].record.ply, 7);
}

#[test]
fn test_empty_game_ranks_nothing() {
    let corpus = opening_corpus();
    let ranked = StudyRanker::new(1)
        .rank(&QuerySequence::default(), &corpus)
        .unwrap();
    assert!(ranked.is_empty());
}

#[test]
fn test_partial_game_is_ranked_on_its_prefix() {
    let search = opening_search();
    let response = search
        .rank_pgn(&StandardReplayer::new(), "1. d4 d5 2. c4 e6 3. Qxh7 *", 1)
        .unwrap();
    assert_eq!(response.stats.plies, 5);
    assert_eq!(response.entries[0].document_id.as_str(), "qgd77");
}

#[test]
fn test_threads_share_one_search() {
    let search = opening_search();
    let games = ["1. e4 e6 2. d4 d5 *", "1. d4 d5 2. c4 *", "1. e4 c5 2. Nf3 *"];
    let corpus = Arc::clone(search.corpus());

    let handles: Vec<_> = games
        .iter()
        .map(|game| {
            let search = search.clone();
            let snaps = snapshots(game);
            thread::spawn(move || search.rank_game(&snaps, 1).unwrap().entries[0].document_id.clone())
        })
        .collect();
    let winners: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().to_string())
        .collect();

    assert_eq!(winners, vec!["frenchA1", "qgd77", "sicilian01"]);
    assert_eq!(corpus.len(), 40);
}

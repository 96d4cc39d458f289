//! Similarity matcher
//!
//! Finds the corpus records closest to one encoded query position.
//!
//! Every record is compared against the query; there is no approximate
//! candidate index. Three scans are provided and return identical lists:
//! - `find_closest`: bounded top-K heap; the current K-th distance caps
//!   each edit-distance computation so hopeless records exit early
//! - `find_closest_exhaustive`: full distance for every record, then sort
//! - `find_closest_parallel`: `find_closest` over corpus chunks on the
//!   rayon pool, merged into the joint top-K
//!
//! # Ordering
//!
//! Ascending distance; equal distances keep corpus order (lower corpus
//! position first).

use crate::distance::{Levenshtein, PositionDistance};
use crate::index::CorpusIndex;
use rayon::prelude::*;
use std::collections::BinaryHeap;
use studymatch_core::{PositionMatch, PositionRecord};

/// Corpus records per parallel work unit
const PARALLEL_CHUNK: usize = 4096;

/// A corpus record at some distance from the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredRecord<'a> {
    /// Edit distance to the query
    pub distance: usize,
    /// Position of the record in the corpus
    pub corpus_position: usize,
    /// The record
    pub record: &'a PositionRecord,
}

impl ScoredRecord<'_> {
    /// Owned copy for responses
    pub fn to_match(&self) -> PositionMatch {
        PositionMatch {
            distance: self.distance,
            record: self.record.clone(),
        }
    }
}

/// Closest records to `query` in the corpus, at most `top_k`
///
/// An empty query or corpus, or `top_k == 0`, gives an empty list.
pub fn find_closest<'a>(query: &str, corpus: &'a CorpusIndex, top_k: usize) -> Vec<ScoredRecord<'a>> {
    find_closest_in(&Levenshtein, query, corpus.all_records(), 0, top_k)
}

/// Reference scan: every distance computed in full, then sorted
pub fn find_closest_exhaustive<'a>(
    query: &str,
    corpus: &'a CorpusIndex,
    top_k: usize,
) -> Vec<ScoredRecord<'a>> {
    if query.is_empty() || top_k == 0 {
        return Vec::new();
    }
    let metric = Levenshtein;
    let mut scored: Vec<ScoredRecord<'a>> = corpus
        .all_records()
        .iter()
        .enumerate()
        .map(|(corpus_position, record)| ScoredRecord {
            distance: metric.distance(query, &record.encoded),
            corpus_position,
            record,
        })
        .collect();
    // stable: equal distances stay in corpus order
    scored.sort_by_key(|s| s.distance);
    scored.truncate(top_k);
    scored
}

/// `find_closest` with the corpus split across the rayon pool
pub fn find_closest_parallel<'a>(
    query: &str,
    corpus: &'a CorpusIndex,
    top_k: usize,
) -> Vec<ScoredRecord<'a>> {
    if query.is_empty() || top_k == 0 {
        return Vec::new();
    }
    let records = corpus.all_records();
    if records.len() <= PARALLEL_CHUNK {
        return find_closest_in(&Levenshtein, query, records, 0, top_k);
    }

    let mut merged: Vec<ScoredRecord<'a>> = records
        .par_chunks(PARALLEL_CHUNK)
        .enumerate()
        .flat_map_iter(|(chunk, slice)| {
            find_closest_in(&Levenshtein, query, slice, chunk * PARALLEL_CHUNK, top_k)
        })
        .collect();
    merged.sort_by_key(|s| (s.distance, s.corpus_position));
    merged.truncate(top_k);
    merged
}

/// Bounded top-K scan of `records`, whose first element sits at corpus
/// position `offset`
///
/// Once K candidates are held, a record can only enter with a distance
/// strictly below the current worst: it comes later in corpus order, so
/// it loses every tie.
pub fn find_closest_in<'a>(
    metric: &dyn PositionDistance,
    query: &str,
    records: &'a [PositionRecord],
    offset: usize,
    top_k: usize,
) -> Vec<ScoredRecord<'a>> {
    if query.is_empty() || top_k == 0 || records.is_empty() {
        return Vec::new();
    }

    // max-heap on (distance, position): the top is the current worst
    let mut heap: BinaryHeap<(usize, usize)> = BinaryHeap::with_capacity(top_k + 1);
    for (i, record) in records.iter().enumerate() {
        let bound = match heap.peek() {
            Some(&(worst, _)) if heap.len() == top_k => {
                if worst == 0 {
                    break;
                }
                worst - 1
            }
            _ => usize::MAX,
        };
        if let Some(distance) = metric.distance_within(query, &record.encoded, bound) {
            heap.push((distance, i));
            if heap.len() > top_k {
                heap.pop();
            }
        }
    }

    heap.into_sorted_vec()
        .into_iter()
        .map(|(distance, i)| ScoredRecord {
            distance,
            corpus_position: offset + i,
            record: &records[i],
        })
        .collect()
}

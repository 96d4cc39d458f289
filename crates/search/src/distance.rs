//! Edit distance between encoded positions
//!
//! This module provides:
//! - `levenshtein`: exact Levenshtein distance (unit-cost insert, delete, substitute)
//! - `levenshtein_within`: the same distance with an early exit once it
//!   provably exceeds a bound
//! - `PositionDistance` trait and the `Levenshtein` implementation used by
//!   the matcher
//!
//! Both functions are exact: whenever `levenshtein_within` returns
//! `Some(d)`, `d == levenshtein(a, b)`.

/// Exact Levenshtein distance
///
/// ```
/// use studymatch_search::distance::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a.is_ascii() && b.is_ascii() {
        edit_distance(a.as_bytes(), b.as_bytes(), usize::MAX)
    } else {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        edit_distance(&a, &b, usize::MAX)
    }
}

/// Levenshtein distance if it is at most `bound`, `None` otherwise
pub fn levenshtein_within(a: &str, b: &str, bound: usize) -> Option<usize> {
    let d = if a.is_ascii() && b.is_ascii() {
        edit_distance(a.as_bytes(), b.as_bytes(), bound)
    } else {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        edit_distance(&a, &b, bound)
    };
    (d <= bound).then_some(d)
}

/// Two-row dynamic program
///
/// Returns the exact distance when it is `<= bound`; otherwise some value
/// `> bound`. Every cell of the final row is at least the minimum of the
/// current row, so a row whose minimum exceeds `bound` ends the scan.
fn edit_distance<T: PartialEq>(a: &[T], b: &[T], bound: usize) -> usize {
    let over = bound.saturating_add(1);
    if a.len().abs_diff(b.len()) > bound {
        return over;
    }
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            let cell = substitution.min(deletion).min(insertion);
            curr[j + 1] = cell;
            row_min = row_min.min(cell);
        }
        if row_min > bound {
            return over;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ============================================================================
// PositionDistance
// ============================================================================

/// Distance between two encoded positions
///
/// Lower means more similar. Implementations must be symmetric and
/// return 0 exactly for identical inputs.
///
/// # Thread Safety
///
/// Metrics must be Send + Sync; the matcher may scan on several threads.
pub trait PositionDistance: Send + Sync {
    /// Exact distance
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Exact distance if it is at most `bound`
    ///
    /// The default computes the full distance first.
    fn distance_within(&self, a: &str, b: &str, bound: usize) -> Option<usize> {
        let d = self.distance(a, b);
        (d <= bound).then_some(d)
    }

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Unit-cost Levenshtein distance
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl PositionDistance for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }

    fn distance_within(&self, a: &str, b: &str, bound: usize) -> Option<usize> {
        levenshtein_within(a, b, bound)
    }

    fn name(&self) -> &str {
        "levenshtein"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("abc", "abd"), 1);
        assert_eq!(levenshtein("abc", "ab"), 1);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_levenshtein_one_move_apart() {
        // 1. e4 moves one pawn: two squares change
        let start = "rnbqkbnr/pppppppp/......../......../......../......../PPPPPPPP/RNBQKBNR";
        let e4 = "rnbqkbnr/pppppppp/......../......../....P.../......../PPPP.PPP/RNBQKBNR";
        assert_eq!(levenshtein(start, e4), 2);
    }

    #[test]
    fn test_levenshtein_non_ascii() {
        assert_eq!(levenshtein("k·····", "k····K"), 1);
        assert_eq!(levenshtein_within("k·····", "·k····", 1), None);
        assert_eq!(levenshtein_within("k·····", "·k····", 2), Some(2));
    }

    #[test]
    fn test_within_bound_edges() {
        assert_eq!(levenshtein_within("abcd", "abcd", 0), Some(0));
        assert_eq!(levenshtein_within("abcd", "abce", 0), None);
        assert_eq!(levenshtein_within("abcd", "abce", 1), Some(1));
        assert_eq!(levenshtein_within("a", "abcdef", 3), None);
        assert_eq!(levenshtein_within("", "abc", 3), Some(3));
        assert_eq!(levenshtein_within("", "abc", 2), None);
    }

    #[test]
    fn test_metric_trait() {
        let metric = Levenshtein;
        assert_eq!(metric.name(), "levenshtein");
        assert_eq!(metric.distance("ab", "ba"), 2);
        assert_eq!(metric.distance_within("ab", "ba", 1), None);
    }

    fn board() -> impl Strategy<Value = String> {
        "[.pnbrqkPNBRQK]{16}"
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in board(), b in board()) {
            prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        }

        #[test]
        fn prop_identity(a in board(), b in board()) {
            prop_assert_eq!(levenshtein(&a, &a), 0);
            prop_assert_eq!(levenshtein(&a, &b) == 0, a == b);
        }

        #[test]
        fn prop_bounded_by_hamming(a in board(), b in board()) {
            let hamming = a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count();
            prop_assert!(levenshtein(&a, &b) <= hamming);
        }

        #[test]
        fn prop_within_agrees_with_exact(a in board(), b in "[.pP]{10,20}", bound in 0usize..24) {
            let exact = levenshtein(&a, &b);
            let within = levenshtein_within(&a, &b, bound);
            if exact <= bound {
                prop_assert_eq!(within, Some(exact));
            } else {
                prop_assert_eq!(within, None);
            }
        }
    }
}

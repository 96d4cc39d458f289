//! PGN splitting
//!
//! Splits a multi-game PGN text into games, each with its tag pairs and
//! the mainline move tokens. Only what the replayer needs survives:
//! - comments (`{...}` and `;` to end of line) are dropped
//! - variations (nested `(...)`) are dropped
//! - NAGs (`$n`), move numbers (`12.`, `12...`) and results are dropped
//! - annotation glyphs (`!`, `?`) are stripped from moves
//!
//! A game ends at a result token, at a tag pair that follows movetext,
//! or at end of input.

/// One game of a PGN text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnGame {
    /// Tag pairs in source order
    pub headers: Vec<(String, String)>,
    /// Mainline moves in SAN, glyphs stripped
    pub moves: Vec<String>,
}

impl PgnGame {
    /// Value of the first tag with this name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.moves.is_empty()
    }
}

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Split PGN text into games
///
/// # Example
///
/// ```
/// use studymatch_rules::pgn::split_games;
///
/// let games = split_games("[Event \"A\"]\n1. e4 e5 *\n\n[Event \"B\"]\n1. d4 *");
/// assert_eq!(games.len(), 2);
/// assert_eq!(games[0].header("Event"), Some("A"));
/// assert_eq!(games[0].moves, vec!["e4", "e5"]);
/// assert_eq!(games[1].moves, vec!["d4"]);
/// ```
pub fn split_games(text: &str) -> Vec<PgnGame> {
    let chars: Vec<char> = text.chars().collect();
    let mut games = Vec::new();
    let mut current = PgnGame::default();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '[' => {
                if !current.moves.is_empty() {
                    games.push(std::mem::take(&mut current));
                }
                let (tag, next) = read_tag(&chars, i + 1);
                if let Some(tag) = tag {
                    current.headers.push(tag);
                }
                i = next;
            }
            '{' => i = skip_until(&chars, i + 1, '}'),
            ';' => i = skip_until(&chars, i + 1, '\n'),
            '(' => i = skip_variation(&chars, i + 1),
            // stray closer from unbalanced input
            ')' | '}' | ']' => i += 1,
            '%' if i == 0 || chars[i - 1] == '\n' => i = skip_until(&chars, i + 1, '\n'),
            _ => {
                let start = i;
                while i < chars.len() && !is_token_boundary(chars[i]) {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();
                if RESULTS.contains(&token.as_str()) {
                    if !current.is_empty() {
                        games.push(std::mem::take(&mut current));
                    }
                } else if let Some(san) = clean_move_token(&token) {
                    current.moves.push(san);
                }
            }
        }
    }

    if !current.is_empty() {
        games.push(current);
    }
    games
}

fn is_token_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '}' | '(' | ')' | '[' | ']' | ';')
}

/// Position just past `end`, or end of input
fn skip_until(chars: &[char], mut i: usize, end: char) -> usize {
    while i < chars.len() && chars[i] != end {
        i += 1;
    }
    (i + 1).min(chars.len())
}

/// Skip a variation body, honoring nesting and comments inside it
fn skip_variation(chars: &[char], mut i: usize) -> usize {
    let mut depth = 1usize;
    while i < chars.len() {
        match chars[i] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            '{' => {
                i = skip_until(chars, i + 1, '}');
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

/// Parse `Name "value"]` starting after the opening bracket
fn read_tag(chars: &[char], mut i: usize) -> (Option<(String, String)>, usize) {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    let name_start = i;
    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '"' && chars[i] != ']' {
        i += 1;
    }
    let name: String = chars[name_start..i].iter().collect();

    while i < chars.len() && chars[i] != '"' && chars[i] != ']' {
        i += 1;
    }
    let mut value = String::new();
    if i < chars.len() && chars[i] == '"' {
        i += 1;
        while i < chars.len() && chars[i] != '"' {
            if chars[i] == '\\' && i + 1 < chars.len() {
                i += 1;
            }
            value.push(chars[i]);
            i += 1;
        }
        i += 1;
    }
    let next = skip_until(chars, i.min(chars.len()), ']');

    if name.is_empty() {
        (None, next)
    } else {
        (Some((name, value)), next)
    }
}

/// Reduce a movetext token to bare SAN, or `None` if it carries no move
fn clean_move_token(token: &str) -> Option<String> {
    if token.starts_with('$') {
        return None;
    }

    // Move numbers, possibly glued to the move: "12.", "12...", "1.e4"
    let mut rest = token;
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 && rest[digits..].starts_with('.') {
        rest = &rest[digits..];
    }
    let rest = rest.trim_start_matches('.');

    let san = rest.trim_end_matches(|c| c == '!' || c == '?');
    if san.is_empty() {
        return None;
    }

    Some(match san {
        "0-0" => "O-O".to_string(),
        "0-0+" => "O-O+".to_string(),
        "0-0-0" => "O-O-O".to_string(),
        "0-0-0+" => "O-O-O+".to_string(),
        _ => san.to_string(),
    })
}

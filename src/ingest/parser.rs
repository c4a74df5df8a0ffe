//! Result line grammar
//!
//! ```text
//! line     := [prefix] score "/6" rest
//! score    := "1".."6" | "X"            (case-insensitive)
//! rest     := { mention | other }
//! mention  := "<@" ["!"] digits ">"     numeric-id mention
//!           | "@" name                  bare-name mention, name not all digits
//! ```
//!
//! Mentions are only read from the text after the score token. A numeric-id
//! mention always wins over a bare name: the `@` inside `<@123>` never starts
//! a bare-name mention because it is preceded by `<`. Markdown emphasis and
//! parentheses around a bare name are stripped.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Attempt value recorded for an unsolved puzzle
pub const FAILURE_ATTEMPTS: u8 = 6;

static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^0-9a-z])([1-6x])/6").expect("valid score regex")
});

static ID_MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@!?(\d+)>").expect("valid id mention regex"));

static NAME_MENTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s,:;*_(])@([^\s,;<>@]+)").expect("valid name mention regex")
});

const NAME_TRAILING_PUNCTUATION: &[char] = &['*', '_', '.', '!', '?', ':', ')', '('];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MentionToken {
    UserId(u64),
    Name(String),
}

/// One (participant, score) pair read from an announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResult {
    pub mention: MentionToken,
    pub attempts: u8,
    pub success: bool,
}

/// Parses every line, in order, into participant results.
///
/// Lines without a score token or without mentions are skipped.
pub fn parse_results<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<ParsedResult> {
    let mut results = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        let Some((attempts, success, rest)) = parse_score(line) else {
            debug!(line_index = index, "Skipping line without score token");
            continue;
        };

        let mentions = parse_mentions(rest);
        if mentions.is_empty() {
            debug!(line_index = index, "Skipping score line without mentions");
            continue;
        }

        results.extend(mentions.into_iter().map(|mention| ParsedResult {
            mention,
            attempts,
            success,
        }));
    }

    results
}

/// Returns the attempt count, success flag and the text following the score.
fn parse_score(line: &str) -> Option<(u8, bool, &str)> {
    let caps = SCORE_RE.captures(line)?;
    let whole = caps.get(0)?;
    let token = caps.get(1)?.as_str();

    let (attempts, success) = if token.eq_ignore_ascii_case("x") {
        (FAILURE_ATTEMPTS, false)
    } else {
        (token.parse().ok()?, true)
    };

    Some((attempts, success, &line[whole.end()..]))
}

fn parse_mentions(text: &str) -> Vec<MentionToken> {
    let mut found: Vec<(usize, MentionToken)> = Vec::new();

    for caps in ID_MENTION_RE.captures_iter(text) {
        let Some(id) = caps.get(1) else { continue };
        match id.as_str().parse::<u64>() {
            Ok(value) => found.push((id.start(), MentionToken::UserId(value))),
            Err(_) => debug!(token = id.as_str(), "Numeric mention out of range"),
        }
    }

    for caps in NAME_MENTION_RE.captures_iter(text) {
        let Some(raw) = caps.get(1) else { continue };
        let name = raw.as_str().trim_end_matches(NAME_TRAILING_PUNCTUATION);
        if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        found.push((raw.start(), MentionToken::Name(name.to_string())));
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, mention)| mention).collect()
}

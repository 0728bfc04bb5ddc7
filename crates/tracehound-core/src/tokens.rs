//! Error token extraction and frequency counting.
//!
//! A line qualifies on a loose case-insensitive substring pre-filter
//! ("error", "warning", "exception"); structured tokens such as
//! `NullPointerException` or `ValueWarning` are then pulled from qualifying
//! lines with a word pattern.

use std::sync::LazyLock;

use regex::Regex;

use crate::counter::StableCounter;
use crate::types::LogLine;

/// Matches an error-type token: word characters ending in Error, Exception,
/// or Warning (e.g. `NullPointerException`, `ValueWarning`).
static ERROR_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:Error|Exception|Warning)").expect("Invalid ERROR_TOKEN_REGEX")
});

/// Number of entries in the ranked error-type view
pub const TOP_ERROR_TYPES: usize = 10;

/// Loose qualifying rule: does the line mention errors, warnings, or
/// exceptions at all? (Substring match, not the token pattern.)
pub fn is_qualifying(line: &str) -> bool {
    let lowered = line.to_lowercase();
    lowered.contains("error") || lowered.contains("warning") || lowered.contains("exception")
}

/// All structured error tokens on a line, in order of appearance
pub fn extract_tokens(line: &str) -> Vec<String> {
    ERROR_TOKEN_REGEX
        .find_iter(line)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Aggregated token extractor output.
#[derive(Debug, Clone, Default)]
pub struct TokenStats {
    /// Lines that passed the loose pre-filter, in input order.
    /// Reused later for patch suggestions.
    pub qualifying_lines: Vec<LogLine>,

    /// Frequency counts over structured tokens, first-seen order preserved
    pub counts: StableCounter,
}

impl TokenStats {
    /// Scan every line in order
    pub fn scan(lines: &[LogLine]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            if !is_qualifying(&line.text) {
                continue;
            }
            for token in extract_tokens(&line.text) {
                stats.counts.count(&token);
            }
            stats.qualifying_lines.push(line.clone());
        }
        stats
    }

    /// The ranked top-N error-type view
    pub fn top(&self) -> Vec<(&str, usize)> {
        self.counts.top(TOP_ERROR_TYPES)
    }
}

/// Tokens from `counts` whose literal text appears as a substring of
/// `text`. Used to cross-reference a findings set against a cached report.
pub fn overlapping_tokens<'a>(counts: &'a StableCounter, text: &str) -> Vec<&'a str> {
    counts
        .iter()
        .map(|(token, _)| token)
        .filter(|token| text.contains(*token))
        .collect()
}

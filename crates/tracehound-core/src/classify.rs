//! Line classifier: severity tags and timestamps.
//!
//! Each line is scanned (not anchored) for a level keyword and for a
//! `YYYY-MM-DD[ T]HH:MM:SS` timestamp. The two extractions are independent;
//! a line can yield a level, a timestamp, both, or neither. Strings that
//! look like timestamps but fail calendar validation are dropped silently.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{NaiveDateTime, Timelike};
use regex::Regex;

use crate::counter::StableCounter;
use crate::types::{LogLevel, LogLine};

/// Matches a timestamp of the shape `YYYY-MM-DD HH:MM:SS` or
/// `YYYY-MM-DDTHH:MM:SS` anywhere in a line.
/// Captures: 1=date, 2=time
static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}:\d{2})").expect("Invalid TIMESTAMP_REGEX")
});

/// Find the severity tag on a line, if any.
///
/// Case-insensitive substring search; first match in [`LogLevel::ALL`]
/// order wins, so a line is never double-counted.
pub fn extract_level(line: &str) -> Option<LogLevel> {
    let lowered = line.to_lowercase();
    LogLevel::ALL
        .iter()
        .copied()
        .find(|level| lowered.contains(&level.as_str().to_lowercase()))
}

/// Find the first well-formed timestamp on a line, if any.
///
/// The pattern match is only a pre-filter; chrono performs calendar
/// validation and malformed values (month 13, hour 27) are discarded.
pub fn extract_timestamp(line: &str) -> Option<NaiveDateTime> {
    let caps = TIMESTAMP_REGEX.captures(line)?;
    let raw = format!("{} {}", &caps[1], &caps[2]);
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S").ok()
}

/// Truncate a timestamp to its hour bucket key
fn hour_bucket(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(ts)
}

/// Aggregated classifier output: a level histogram and an hour-bucketed
/// timestamp histogram.
#[derive(Debug, Clone, Default)]
pub struct LineStats {
    /// Counts per canonical level tag; ranked views tie by first-seen order
    pub levels: StableCounter,

    /// Counts per hour bucket, iterated in ascending key order
    pub hourly: BTreeMap<NaiveDateTime, usize>,
}

impl LineStats {
    /// Classify every line in order
    pub fn scan(lines: &[LogLine]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            if let Some(level) = extract_level(&line.text) {
                stats.levels.count(level.as_str());
            }
            if let Some(ts) = extract_timestamp(&line.text) {
                *stats.hourly.entry(hour_bucket(ts)).or_insert(0) += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<LogLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| LogLine::new(i + 1, *t))
            .collect()
    }

    #[test]
    fn test_extract_level_case_insensitive() {
        assert_eq!(extract_level("2024-01-01 error: boom"), Some(LogLevel::Error));
        assert_eq!(extract_level("[WARNING] disk nearly full"), Some(LogLevel::Warning));
        assert_eq!(extract_level("no tag here"), None);
    }

    #[test]
    fn test_extract_level_first_match_wins() {
        // Both INFO and ERROR appear; detection order ranks INFO first
        assert_eq!(
            extract_level("INFO retrying after ERROR"),
            Some(LogLevel::Info)
        );
    }

    #[test]
    fn test_extract_timestamp_space_and_t_separators() {
        let a = extract_timestamp("at 2024-01-01 10:00:00 something");
        let b = extract_timestamp("at 2024-01-01T10:00:00 something");
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn test_malformed_timestamp_dropped_silently() {
        // Passes the pattern, fails calendar validation
        assert_eq!(extract_timestamp("2024-13-40 99:99:99 ERROR"), None);
        assert_eq!(extract_timestamp("no timestamp"), None);
    }

    #[test]
    fn test_scan_builds_both_histograms() {
        let input = lines(&[
            "2024-01-01 10:00:00 ERROR NullPointerException occurred",
            "2024-01-01 10:15:00 INFO started",
            "2024-01-01 11:02:03 INFO still running",
            "no metadata at all",
        ]);
        let stats = LineStats::scan(&input);

        assert_eq!(stats.levels.get("ERROR"), 1);
        assert_eq!(stats.levels.get("INFO"), 2);

        let buckets: Vec<usize> = stats.hourly.values().copied().collect();
        assert_eq!(buckets, vec![2, 1]);

        let first = *stats.hourly.keys().next().unwrap();
        assert_eq!(first.hour(), 10);
        assert_eq!(first.minute(), 0);
        assert_eq!(first.second(), 0);
    }

    #[test]
    fn test_level_and_timestamp_are_independent() {
        let input = lines(&["2024-01-01 10:00:00 plain message"]);
        let stats = LineStats::scan(&input);
        assert!(stats.levels.is_empty());
        assert_eq!(stats.hourly.len(), 1);
    }
}

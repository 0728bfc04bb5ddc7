//! One-pass analysis over a log text blob.
//!
//! Runs the line classifier, the error token extractor, and all three
//! stack trace segmenters over the same line sequence, then extracts
//! frames per segmented block. Pure and synchronous; collaborator calls
//! happen later, at assembly time.

use crate::classify::LineStats;
use crate::frames::extract_frames;
use crate::segment::segment_all;
use crate::tokens::TokenStats;
use crate::types::{Frame, LogLine, StackTraceBlock, TraceConvention};

/// Split raw text into 1-indexed log lines
pub fn read_lines(text: &str) -> Vec<LogLine> {
    text.lines()
        .enumerate()
        .map(|(i, line)| LogLine::new(i + 1, line))
        .collect()
}

/// A segmented trace paired with its extracted frames.
#[derive(Debug, Clone)]
pub struct AnalyzedTrace {
    pub block: StackTraceBlock,
    pub frames: Vec<Frame>,
}

/// The complete structured findings for one log text.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Total number of input lines
    pub total_lines: usize,

    /// Level and hourly histograms
    pub line_stats: LineStats,

    /// Qualifying lines and error-type counts
    pub token_stats: TokenStats,

    /// Traces grouped in convention report order
    pub traces: Vec<AnalyzedTrace>,
}

impl Analysis {
    /// Analyze one text blob
    pub fn scan(text: &str) -> Self {
        let lines = read_lines(text);

        let line_stats = LineStats::scan(&lines);
        let token_stats = TokenStats::scan(&lines);
        let traces = segment_all(&lines)
            .into_iter()
            .map(|block| {
                let frames = extract_frames(&block);
                AnalyzedTrace { block, frames }
            })
            .collect();

        Self {
            total_lines: lines.len(),
            line_stats,
            token_stats,
            traces,
        }
    }

    /// Traces belonging to one convention, in close order
    pub fn traces_for(&self, convention: TraceConvention) -> Vec<&AnalyzedTrace> {
        self.traces
            .iter()
            .filter(|t| t.block.convention == convention)
            .collect()
    }

    pub fn has_traces(&self) -> bool {
        !self.traces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lines_one_based() {
        let lines = read_lines("a\nb\nc");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].index, 1);
        assert_eq!(lines[2].text, "c");
    }

    #[test]
    fn test_scan_wires_all_stages() {
        let text = "\
2024-01-01 10:00:00 ERROR NullPointerException occurred
Traceback (most recent call last):
  File \"a.py\", line 10, in foo
ValueError: bad
2024-01-01 10:30:00 INFO done";

        let analysis = Analysis::scan(text);
        assert_eq!(analysis.total_lines, 5);
        assert_eq!(analysis.line_stats.levels.get("ERROR"), 1);
        assert_eq!(analysis.token_stats.counts.get("NullPointerException"), 1);
        assert!(analysis.has_traces());

        let python = analysis.traces_for(TraceConvention::Python);
        assert_eq!(python.len(), 1);
        assert_eq!(python[0].frames.len(), 1);
        assert_eq!(python[0].frames[0].file, "a.py");
    }

    #[test]
    fn test_scan_plain_log_has_no_traces() {
        let analysis = Analysis::scan("INFO a\nINFO b");
        assert!(!analysis.has_traces());
        assert_eq!(analysis.total_lines, 2);
    }
}

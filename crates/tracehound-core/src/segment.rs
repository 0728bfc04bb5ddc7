//! Stack trace segmenters.
//!
//! One line-by-line state machine, parameterized per convention, groups
//! contiguous log lines into [`StackTraceBlock`]s. Three conventions are
//! recognized: Python tracebacks, Java exception dumps, and Node.js error
//! stacks. The segmenters run independently over the same line sequence; a
//! format-ambiguous trace may be claimed by more than one of them, and that
//! duplication is deliberately preserved.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{LogLine, StackTraceBlock, TraceConvention};

// ─────────────────────────────────────────────────────────────────────────────
// Convention Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// Python opener is an exact trimmed match, not a pattern
const PYTHON_OPENER: &str = "Traceback (most recent call last):";

/// Terminal line of a Python traceback: `SomeError:` / `SomeException:` at
/// trim start (e.g. `ValueError: bad input`)
static PYTHON_CLOSER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+(?:Error|Exception):").expect("Invalid PYTHON_CLOSER_REGEX"));

/// Java opener: dotted identifier ending in Exception/Error, then a colon
/// (e.g. `java.lang.NullPointerException: something was null`)
static JAVA_OPENER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$.]*(?:Exception|Error):").expect("Invalid JAVA_OPENER_REGEX")
});

/// Node.js opener: bare identifier ending in Error/Exception at line start
/// (e.g. `TypeError: undefined is not a function`)
static NODE_OPENER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+(?:Error|Exception):").expect("Invalid NODE_OPENER_REGEX"));

// ─────────────────────────────────────────────────────────────────────────────
// Segmenter
// ─────────────────────────────────────────────────────────────────────────────

/// Segmenter states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    InTrace,
}

/// What a closing line does with itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseMode {
    /// Closing line becomes the last line of the block (Python terminator)
    Include,

    /// Closing line is dropped (blank line after Java/Node.js stacks)
    Exclude,
}

/// Line-driven state machine that groups contiguous lines into trace
/// blocks for a single convention.
///
/// Per-convention behavior is supplied as data (opener and closer
/// predicates selected by the convention tag); the control flow is shared.
#[derive(Debug)]
pub struct Segmenter {
    convention: TraceConvention,
    state: State,
    current: Vec<String>,
    blocks: Vec<StackTraceBlock>,
}

impl Segmenter {
    /// Create a segmenter in the Scanning state
    pub fn new(convention: TraceConvention) -> Self {
        Self {
            convention,
            state: State::Scanning,
            current: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Feed one line; completed blocks accumulate internally
    pub fn feed_line(&mut self, line: &str) {
        match self.state {
            State::Scanning => {
                if self.is_opener(line) {
                    self.state = State::InTrace;
                    self.current.push(line.to_string());
                }
            }
            State::InTrace => {
                // A fresh opener closes the current block (without the
                // opener) and starts the next one
                if self.is_opener(line) {
                    self.emit();
                    self.current.push(line.to_string());
                    return;
                }

                match self.close_mode(line) {
                    Some(CloseMode::Include) => {
                        self.current.push(line.to_string());
                        self.emit();
                        self.state = State::Scanning;
                    }
                    Some(CloseMode::Exclude) => {
                        self.emit();
                        self.state = State::Scanning;
                    }
                    None => self.current.push(line.to_string()),
                }
            }
        }
    }

    /// Flush any still-open block at end of input and return all blocks in
    /// close order.
    pub fn finish(mut self) -> Vec<StackTraceBlock> {
        if self.state == State::InTrace && !self.current.is_empty() {
            self.emit();
        }
        self.blocks
    }

    fn emit(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.blocks.push(StackTraceBlock {
            convention: self.convention,
            lines,
        });
    }

    fn is_opener(&self, line: &str) -> bool {
        match self.convention {
            TraceConvention::Python => line.trim() == PYTHON_OPENER,
            TraceConvention::Java => JAVA_OPENER_REGEX.is_match(line.trim()),
            TraceConvention::NodeJs => NODE_OPENER_REGEX.is_match(line),
        }
    }

    fn close_mode(&self, line: &str) -> Option<CloseMode> {
        match self.convention {
            TraceConvention::Python => {
                if line.trim().is_empty() || PYTHON_CLOSER_REGEX.is_match(line.trim_start()) {
                    Some(CloseMode::Include)
                } else {
                    None
                }
            }
            TraceConvention::Java | TraceConvention::NodeJs => {
                if line.trim().is_empty() {
                    Some(CloseMode::Exclude)
                } else {
                    None
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Segment one convention over the full line sequence
pub fn segment(lines: &[LogLine], convention: TraceConvention) -> Vec<StackTraceBlock> {
    let mut segmenter = Segmenter::new(convention);
    for line in lines {
        segmenter.feed_line(&line.text);
    }
    segmenter.finish()
}

/// Run all three segmenters independently over the same line sequence.
///
/// Blocks are grouped in convention report order (python, java, nodejs);
/// within a convention they keep close order.
pub fn segment_all(lines: &[LogLine]) -> Vec<StackTraceBlock> {
    TraceConvention::ALL
        .iter()
        .flat_map(|&convention| segment(lines, convention))
        .collect()
}

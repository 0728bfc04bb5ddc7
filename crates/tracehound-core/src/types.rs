//! Core domain types for log analysis.
//!
//! Everything the pipeline passes between stages lives here: raw log lines,
//! severity tags, segmented stack trace blocks, extracted frames, and the
//! code-context provider handed to the snippet correlator.

use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Log Lines and Levels
// ─────────────────────────────────────────────────────────────────────────────

/// A single raw log line with its 1-based position in the input.
///
/// Immutable once read; the analysis never rewrites line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based line index in the original input
    pub index: usize,

    /// Raw line text, without the trailing newline
    pub text: String,
}

impl LogLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// Log severity tag detected on a line.
///
/// Detection is a case-insensitive substring search; a line carries at most
/// one tag and the first match in declaration order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Debug,
    Critical,
}

impl LogLevel {
    /// All levels in detection order (first match wins)
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Debug,
        LogLevel::Critical,
    ];

    /// Canonical upper-case tag used in histograms and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stack Traces
// ─────────────────────────────────────────────────────────────────────────────

/// Stack trace conventions the segmenters recognize, in fixed report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceConvention {
    Python,
    Java,
    NodeJs,
}

impl TraceConvention {
    /// All conventions in report order
    pub const ALL: [TraceConvention; 3] = [
        TraceConvention::Python,
        TraceConvention::Java,
        TraceConvention::NodeJs,
    ];

    /// Human-readable section heading name
    pub fn display_name(&self) -> &'static str {
        match self {
            TraceConvention::Python => "Python",
            TraceConvention::Java => "Java",
            TraceConvention::NodeJs => "Node.js",
        }
    }
}

/// A contiguous run of lines representing one stack trace under one
/// convention. Immutable once closed by a segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackTraceBlock {
    /// Which convention's segmenter produced this block
    pub convention: TraceConvention,

    /// Raw lines in input order, exactly as they appeared
    pub lines: Vec<String>,
}

impl StackTraceBlock {
    /// The full block text, lines joined with newlines
    pub fn raw(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// One (file, line, function) location extracted from a trace block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// File path exactly as it appears in the trace (not resolved)
    pub file: String,

    /// 1-based line number
    pub line: u32,

    /// Function/method name; empty for anonymous Node.js frames
    pub function: String,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named source file carried inside a [`CodeBundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextFile {
    pub filename: String,
    pub content: String,
}

impl ContextFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A pre-fetched bundle of repository content: optional README plus an
/// ordered list of source files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBundle {
    pub readme: Option<String>,
    pub files: Vec<ContextFile>,
}

impl CodeBundle {
    pub fn is_empty(&self) -> bool {
        self.readme.is_none() && self.files.is_empty()
    }
}

/// Capability form of the code-context provider: resolve a trace file path
/// to source text, if available. Implementations read local checkouts or
/// pre-fetched caches; resolution misses return `None`, never an error.
pub trait SourceFetcher {
    fn fetch(&self, path: &str) -> Option<String>;
}

/// The code-context provider handed to the snippet correlator.
///
/// Two concrete shapes are supported (an explicit tagged variant instead of
/// the duck typing the boundary originally allowed): a static bundle of
/// already-fetched files, or a fetch capability resolved per frame.
pub enum CodeContextProvider {
    /// No context available; snippet resolution is silently skipped
    Absent,

    /// Static bundle; frames resolve by filename suffix match
    Bundle(CodeBundle),

    /// Fetch capability; frames resolve by calling `fetch(file_path)`
    Fetcher(Box<dyn SourceFetcher + Send + Sync>),
}

impl CodeContextProvider {
    pub fn is_absent(&self) -> bool {
        matches!(self, CodeContextProvider::Absent)
    }

    /// The bundle, when this provider is the static form
    pub fn bundle(&self) -> Option<&CodeBundle> {
        match self {
            CodeContextProvider::Bundle(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Debug for CodeContextProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeContextProvider::Absent => write!(f, "CodeContextProvider::Absent"),
            CodeContextProvider::Bundle(b) => f
                .debug_struct("CodeContextProvider::Bundle")
                .field("readme", &b.readme.is_some())
                .field("files", &b.files.len())
                .finish(),
            CodeContextProvider::Fetcher(_) => write!(f, "CodeContextProvider::Fetcher(..)"),
        }
    }
}

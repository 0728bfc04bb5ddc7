//! # tracehound-core - Log Parsing and Correlation Engine
//!
//! Foundation crate for tracehound. Ingests free-form application log text
//! and produces structured findings: level/timestamp histograms,
//! error-type frequency counts, segmented multi-language stack traces with
//! extracted frames, optional source snippets, and an ordered markdown
//! report.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (chrono, thiserror, regex, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`LogLine`] - A raw log line with its 1-based index
//! - [`LogLevel`] - Severity tag (Info, Warning, Error, Debug, Critical)
//! - [`TraceConvention`] - Recognized stack trace conventions
//! - [`StackTraceBlock`], [`Frame`] - Segmented traces and their locations
//! - [`CodeContextProvider`], [`SourceFetcher`] - Source resolution shapes
//!
//! ### Pipeline Stages
//! - [`classify`] - Level/timestamp extraction and histograms
//! - [`tokens`] - Error-token extraction and stable frequency counts
//! - [`segment`] - Per-convention line-driven trace segmenters
//! - [`frames`] - Structured frame extraction per convention
//! - [`snippet`] - Bounded source windows around frames
//! - [`analysis`] - One-pass orchestration of all synchronous stages
//! - [`report`] - Ordered document assembly plus collaborator contracts
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use tracehound_core::prelude::*;
//! ```

pub mod analysis;
pub mod classify;
pub mod counter;
pub mod error;
pub mod frames;
pub mod logging;
pub mod report;
pub mod segment;
pub mod snippet;
pub mod tokens;
pub mod types;

/// Prelude for common imports used throughout all tracehound crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use analysis::{read_lines, AnalyzedTrace, Analysis};
pub use classify::{extract_level, extract_timestamp, LineStats};
pub use counter::StableCounter;
pub use error::{Error, Result, ResultExt};
pub use frames::{extract_frames, parse_frame_line};
pub use report::{
    error_report, truncate_excerpt, PatchCollaborator, Report, ReportAssembler,
    SummaryCollaborator, EXCERPT_CAP, PATCH_FILE_CAP,
};
pub use segment::{segment, segment_all, Segmenter};
pub use snippet::{resolve_snippet, Snippet, SNIPPET_CONTEXT};
pub use tokens::{extract_tokens, is_qualifying, overlapping_tokens, TokenStats, TOP_ERROR_TYPES};
pub use types::{
    CodeBundle, CodeContextProvider, ContextFile, Frame, LogLevel, LogLine, SourceFetcher,
    StackTraceBlock, TraceConvention,
};

//! Snippet correlator: source windows around extracted frames.
//!
//! Given a frame and a code-context provider, slice a bounded window of
//! source lines around the reported line. Resolution misses and
//! out-of-range line numbers degrade silently; the correlator never fails.

use crate::types::{CodeBundle, CodeContextProvider, Frame};

/// Lines of context above and below the target line
pub const SNIPPET_CONTEXT: usize = 5;

/// A resolved source window around a frame's target line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// The frame's file path as reported in the trace
    pub file: String,

    /// The frame's 1-based target line (possibly clamped into file bounds)
    pub target_line: usize,

    /// Window rows: (1-based absolute line number, line text)
    pub lines: Vec<(usize, String)>,
}

/// Resolve a snippet for one frame.
///
/// Resolution policy, in order: a fetch capability is called with the
/// frame's file path; a static bundle is searched for the first file whose
/// filename suffix-matches the frame's path; otherwise no snippet.
pub fn resolve_snippet(frame: &Frame, provider: &CodeContextProvider) -> Option<Snippet> {
    let source = match provider {
        CodeContextProvider::Absent => return None,
        CodeContextProvider::Fetcher(fetcher) => fetcher.fetch(&frame.file)?,
        CodeContextProvider::Bundle(bundle) => resolve_from_bundle(frame, bundle)?,
    };
    Some(slice_window(frame, &source))
}

/// First bundle file whose filename is a suffix of the frame's path
/// (`a.py` resolves a frame reported as `src/pkg/a.py`).
fn resolve_from_bundle(frame: &Frame, bundle: &CodeBundle) -> Option<String> {
    bundle
        .files
        .iter()
        .find(|f| frame.file.ends_with(&f.filename))
        .map(|f| f.content.clone())
}

/// Slice the target line and its surrounding context, clamped to file
/// bounds and re-numbered with 1-based absolute line numbers.
fn slice_window(frame: &Frame, source: &str) -> Snippet {
    let all: Vec<&str> = source.lines().collect();
    let total = all.len().max(1);

    let target = (frame.line as usize).clamp(1, total);
    let start = target.saturating_sub(SNIPPET_CONTEXT).max(1);
    let end = (target + SNIPPET_CONTEXT).min(total);

    let lines = (start..=end)
        .map(|n| (n, all.get(n - 1).copied().unwrap_or("").to_string()))
        .collect();

    Snippet {
        file: frame.file.clone(),
        target_line: target,
        lines,
    }
}

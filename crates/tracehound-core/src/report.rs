//! Report assembly: deterministic ordered concatenation of findings.
//!
//! Sections appear in a fixed order and only when their input is present;
//! missing inputs omit the section entirely rather than emitting
//! placeholders. Collaborator calls (summary, patch suggestions) are the
//! only suspension points; their failures surface inline as text supplied
//! by the collaborator implementation, never as errors.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::analysis::Analysis;
use crate::error::Error;
use crate::snippet::resolve_snippet;
use crate::tokens::overlapping_tokens;
use crate::types::{CodeContextProvider, ContextFile, TraceConvention};

/// Character cap on cached-report and README excerpts
pub const EXCERPT_CAP: usize = 1000;

/// Character cap per file handed to the patch collaborator
pub const PATCH_FILE_CAP: usize = 4000;

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator Contracts
// ─────────────────────────────────────────────────────────────────────────────

/// Natural-language summarization of findings against a cached report.
///
/// Failures must come back as a descriptive inline string, not an error;
/// timeouts are the implementation's concern.
#[trait_variant::make(SummaryCollaborator: Send)]
pub trait LocalSummaryCollaborator {
    async fn summarize(&self, findings: &str, cached_report: &str) -> String;
}

/// Patch suggestion for one error line given a bundle of code files.
/// Same inline-failure contract as [`SummaryCollaborator`].
#[trait_variant::make(PatchCollaborator: Send)]
pub trait LocalPatchCollaborator {
    async fn suggest_patch(&self, error_line: &str, files: &[ContextFile]) -> String;
}

// ─────────────────────────────────────────────────────────────────────────────
// Report Document
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered sequence of named markdown sections; append-only during
/// assembly, serialized once at the end.
#[derive(Debug, Clone, Default)]
pub struct Report {
    sections: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one section
    pub fn push(&mut self, section: String) {
        self.sections.push(section);
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Serialize the document
    pub fn render(&self) -> String {
        let mut out = self.sections.join("\n\n");
        out.push('\n');
        out
    }
}

/// Truncate to `cap` characters, appending an explicit ellipsis marker
/// only when truncation occurred.
pub fn truncate_excerpt(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let mut out: String = text.chars().take(cap).collect();
    out.push_str("...");
    out
}

/// One-line error document for unreadable input: no histograms, no
/// partial findings.
pub fn error_report(err: &Error) -> String {
    format!("# Error\n{}\n", err)
}

// ─────────────────────────────────────────────────────────────────────────────
// Assembler
// ─────────────────────────────────────────────────────────────────────────────

/// All inputs for one report assembly. Optional inputs omit their section.
pub struct ReportAssembler<'a, S, P> {
    /// Path of the analyzed log, used in the title
    pub log_path: &'a Path,

    /// Structured findings from [`Analysis::scan`]
    pub analysis: &'a Analysis,

    /// Code context used for snippets, patch files, and the context section
    pub context: &'a CodeContextProvider,

    /// Verbatim text of a related cached report, when one exists
    pub cached_report: Option<&'a str>,

    /// Summary collaborator; absent skips the cached-report summary
    pub summary: Option<&'a S>,

    /// Patch collaborator; absent skips the patch-suggestion section
    pub patch: Option<&'a P>,
}

impl<S, P> ReportAssembler<'_, S, P>
where
    S: SummaryCollaborator + Sync,
    P: PatchCollaborator + Sync,
{
    /// Assemble the full document in its fixed section order
    pub async fn assemble(&self) -> Report {
        let mut report = Report::new();

        report.push(format!(
            "# Log Analysis Report for `{}`",
            self.log_path.display()
        ));

        if let Some(section) = self.level_histogram_section() {
            report.push(section);
        }
        if let Some(section) = self.hourly_histogram_section() {
            report.push(section);
        }
        report.push(self.error_summary_section());

        for convention in TraceConvention::ALL {
            if let Some(section) = self.trace_section(convention) {
                report.push(section);
            }
        }

        if let Some(section) = self.cached_report_section().await {
            report.push(section);
        }
        if let Some(section) = self.patch_section().await {
            report.push(section);
        }
        if let Some(section) = self.code_context_section() {
            report.push(section);
        }

        report
    }

    fn level_histogram_section(&self) -> Option<String> {
        let levels = &self.analysis.line_stats.levels;
        if levels.is_empty() {
            return None;
        }

        let mut section = String::from("## Log Level Histogram\n");
        for (level, count) in levels.top(usize::MAX) {
            section.push_str(&format!("\n- {}: {}", level, count));
        }
        Some(section)
    }

    fn hourly_histogram_section(&self) -> Option<String> {
        let hourly = &self.analysis.line_stats.hourly;
        if hourly.is_empty() {
            return None;
        }

        let mut section = String::from("## Hourly Log Frequency\n");
        for (bucket, count) in hourly {
            section.push_str(&format!("\n- {}: {}", format_bucket(bucket), count));
        }
        Some(section)
    }

    fn error_summary_section(&self) -> String {
        let tokens = &self.analysis.token_stats;

        let mut section = format!(
            "## Error/Warning Summary\n\n- Total lines: {}\n- Error/warning lines: {}",
            self.analysis.total_lines,
            tokens.qualifying_lines.len()
        );

        let top = tokens.top();
        if !top.is_empty() {
            section.push_str("\n\n### Top Error Types\n\n| Error Type | Count |\n| --- | --- |");
            for (token, count) in top {
                section.push_str(&format!("\n| {} | {} |", token, count));
            }
        }
        section
    }

    fn trace_section(&self, convention: TraceConvention) -> Option<String> {
        let traces = self.analysis.traces_for(convention);
        if traces.is_empty() {
            return None;
        }

        let mut section = format!("## {} Stack Traces", convention.display_name());
        for (i, trace) in traces.iter().enumerate() {
            section.push_str(&format!(
                "\n\n### Trace {}\n\n```text\n{}\n```",
                i + 1,
                trace.block.raw()
            ));

            for frame in &trace.frames {
                if let Some(snippet) = resolve_snippet(frame, self.context) {
                    section.push_str(&format!(
                        "\n\nSource for `{}:{}`:\n\n```text",
                        snippet.file, snippet.target_line
                    ));
                    for (n, text) in &snippet.lines {
                        section.push_str(&format!("\n{:>5} | {}", n, text));
                    }
                    section.push_str("\n```");
                }
            }
        }
        Some(section)
    }

    async fn cached_report_section(&self) -> Option<String> {
        let cached = self.cached_report?;

        let mut section = format!(
            "## Related Cached Report\n\n{}",
            truncate_excerpt(cached, EXCERPT_CAP)
        );

        let overlap = overlapping_tokens(&self.analysis.token_stats.counts, cached);
        if !overlap.is_empty() {
            section.push_str("\n\nOverlapping error types:");
            for token in overlap {
                section.push_str(&format!("\n- {}", token));
            }
        }

        if let Some(summarizer) = self.summary {
            let findings = self.error_summary_section();
            let summary = summarizer.summarize(&findings, cached).await;
            section.push_str(&format!("\n\n### Summary\n\n{}", summary));
        }

        Some(section)
    }

    async fn patch_section(&self) -> Option<String> {
        let patcher = self.patch?;
        let qualifying = &self.analysis.token_stats.qualifying_lines;
        if qualifying.is_empty() {
            return None;
        }

        let files = self.capped_patch_files();
        let mut section = String::from("## Patch Suggestions");
        for line in qualifying {
            let suggestion = patcher.suggest_patch(&line.text, &files).await;
            section.push_str(&format!(
                "\n\n### Line {}: `{}`\n\n{}",
                line.index, line.text, suggestion
            ));
        }
        Some(section)
    }

    fn code_context_section(&self) -> Option<String> {
        let bundle = self.context.bundle()?;
        if bundle.is_empty() {
            return None;
        }

        let mut section = String::from("## Code Context");
        if let Some(readme) = &bundle.readme {
            section.push_str(&format!(
                "\n\n### README\n\n{}",
                truncate_excerpt(readme, EXCERPT_CAP)
            ));
        }
        section.push_str(&format!("\n\n- Files: {}", bundle.files.len()));
        Some(section)
    }

    /// The caller-supplied code files with per-file content caps applied
    fn capped_patch_files(&self) -> Vec<ContextFile> {
        self.context
            .bundle()
            .map(|bundle| {
                bundle
                    .files
                    .iter()
                    .map(|f| {
                        ContextFile::new(&f.filename, truncate_excerpt(&f.content, PATCH_FILE_CAP))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn format_bucket(bucket: &NaiveDateTime) -> String {
    bucket.format("%Y-%m-%d %H:00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CodeBundle, ContextFile};
    use std::path::PathBuf;

    struct EchoSummary;

    impl SummaryCollaborator for EchoSummary {
        async fn summarize(&self, _findings: &str, _cached: &str) -> String {
            "summary text".to_string()
        }
    }

    struct EchoPatch;

    impl PatchCollaborator for EchoPatch {
        async fn suggest_patch(&self, error_line: &str, files: &[ContextFile]) -> String {
            format!("patch for `{}` using {} files", error_line, files.len())
        }
    }

    fn assembler<'a>(
        path: &'a PathBuf,
        analysis: &'a Analysis,
        context: &'a CodeContextProvider,
    ) -> ReportAssembler<'a, EchoSummary, EchoPatch> {
        ReportAssembler {
            log_path: path,
            analysis,
            context,
            cached_report: None,
            summary: None,
            patch: None,
        }
    }

    #[test]
    fn test_truncate_excerpt_marks_only_real_truncation() {
        assert_eq!(truncate_excerpt("short", 10), "short");
        assert_eq!(truncate_excerpt("exactly-10", 10), "exactly-10");
        assert_eq!(truncate_excerpt("0123456789abc", 10), "0123456789...");
    }

    #[test]
    fn test_error_report_is_single_section() {
        let err = Error::input("/missing.log", "No such file or directory");
        let doc = error_report(&err);
        assert!(doc.starts_with("# Error\n"));
        assert!(doc.contains("/missing.log"));
        assert!(!doc.contains("Histogram"));
    }

    #[tokio::test]
    async fn test_plain_log_omits_trace_and_collaborator_sections() {
        let path = PathBuf::from("app.log");
        let analysis = Analysis::scan(
            "2024-01-01 10:00:00 ERROR NullPointerException occurred\n\
             INFO one\nINFO two\nINFO three\nINFO four",
        );
        let context = CodeContextProvider::Absent;

        let report = assembler(&path, &analysis, &context).assemble().await;
        let doc = report.render();

        assert!(doc.contains("# Log Analysis Report for `app.log`"));
        assert!(doc.contains("- ERROR: 1"));
        assert!(doc.contains("- INFO: 4"));
        assert!(doc.contains("- 2024-01-01 10:00: 1"));
        assert!(doc.contains("| NullPointerException | 1 |"));
        assert!(!doc.contains("Stack Traces"));
        assert!(!doc.contains("Related Cached Report"));
        assert!(!doc.contains("Patch Suggestions"));
        assert!(!doc.contains("Code Context"));
    }

    #[tokio::test]
    async fn test_section_order_is_fixed() {
        let path = PathBuf::from("app.log");
        let analysis = Analysis::scan(
            "2024-01-01 10:00:00 ERROR KeyError occurred\n\
             Traceback (most recent call last):\n  File \"a.py\", line 2, in f\nKeyError: 'x'",
        );
        let context = CodeContextProvider::Bundle(CodeBundle {
            readme: Some("readme text".to_string()),
            files: vec![ContextFile::new("a.py", "l1\nl2\nl3")],
        });

        let mut asm = assembler(&path, &analysis, &context);
        asm.cached_report = Some("previous report mentioning KeyError");
        asm.summary = Some(&EchoSummary);
        asm.patch = Some(&EchoPatch);

        let doc = asm.assemble().await.render();

        let order = [
            "# Log Analysis Report",
            "## Log Level Histogram",
            "## Hourly Log Frequency",
            "## Error/Warning Summary",
            "## Python Stack Traces",
            "## Related Cached Report",
            "## Patch Suggestions",
            "## Code Context",
        ];
        let mut last = 0;
        for heading in order {
            let pos = doc.find(heading).unwrap_or_else(|| {
                panic!("missing section: {}", heading);
            });
            assert!(pos >= last, "section out of order: {}", heading);
            last = pos;
        }
    }

    #[tokio::test]
    async fn test_trace_section_includes_snippets() {
        let path = PathBuf::from("app.log");
        let source: String = (1..=20)
            .map(|i| format!("src line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let analysis = Analysis::scan(
            "Traceback (most recent call last):\n  File \"a.py\", line 10, in foo\nValueError: bad",
        );
        let context = CodeContextProvider::Bundle(CodeBundle {
            readme: None,
            files: vec![ContextFile::new("a.py", source)],
        });

        let doc = assembler(&path, &analysis, &context).assemble().await.render();
        assert!(doc.contains("Source for `a.py:10`"));
        assert!(doc.contains("    5 | src line 5"));
        assert!(doc.contains("   15 | src line 15"));
        assert!(!doc.contains("   16 |"));
    }

    #[tokio::test]
    async fn test_cached_report_overlap_and_summary() {
        let path = PathBuf::from("app.log");
        let analysis = Analysis::scan("ERROR TypeError raised\nERROR KeyError raised");
        let context = CodeContextProvider::Absent;

        let mut asm = assembler(&path, &analysis, &context);
        asm.cached_report = Some("old findings listed TypeError only");
        asm.summary = Some(&EchoSummary);

        let doc = asm.assemble().await.render();
        assert!(doc.contains("- TypeError"));
        assert!(!doc.contains("- KeyError\n"));
        assert!(doc.contains("### Summary\n\nsummary text"));
    }

    #[tokio::test]
    async fn test_cached_excerpt_is_capped() {
        let path = PathBuf::from("app.log");
        let analysis = Analysis::scan("ERROR plain");
        let context = CodeContextProvider::Absent;
        let long = "x".repeat(EXCERPT_CAP + 50);

        let mut asm = assembler(&path, &analysis, &context);
        asm.cached_report = Some(long.as_str());

        let doc = asm.assemble().await.render();
        let excerpt: String = "x".repeat(EXCERPT_CAP) + "...";
        assert!(doc.contains(&excerpt));
        assert!(!doc.contains(&"x".repeat(EXCERPT_CAP + 1)));
    }

    #[tokio::test]
    async fn test_patch_section_one_subsection_per_qualifying_line() {
        let path = PathBuf::from("app.log");
        let analysis = Analysis::scan("ERROR first failure\nINFO fine\nwarning: second issue");
        let context = CodeContextProvider::Bundle(CodeBundle {
            readme: None,
            files: vec![ContextFile::new("a.py", "content")],
        });

        let mut asm = assembler(&path, &analysis, &context);
        asm.patch = Some(&EchoPatch);

        let doc = asm.assemble().await.render();
        assert!(doc.contains("### Line 1: `ERROR first failure`"));
        assert!(doc.contains("### Line 3: `warning: second issue`"));
        assert!(!doc.contains("### Line 2"));
        assert!(doc.contains("using 1 files"));
    }
}

//! End-to-end tests for the analysis pipeline
//!
//! Run with: cargo test --test analysis_e2e

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use tracehound::config::Settings;
use tracehound::{run_analysis, AnalyzeOptions};
use tracehound_core::{Analysis, LogLevel, TraceConvention};

/// Five-line log: one ERROR with an error token and timestamp, four
/// plain INFO lines in the same hour.
const SIMPLE_LOG: &str = "\
2024-01-01 10:00:00 ERROR NullPointerException occurred
2024-01-01 10:05:00 INFO started
2024-01-01 10:10:00 INFO listening
2024-01-01 10:15:00 INFO request served
2024-01-01 10:20:00 INFO request served
";

fn opts(log_path: impl Into<std::path::PathBuf>, output_dir: &Path) -> AnalyzeOptions {
    AnalyzeOptions {
        log_path: log_path.into(),
        output_dir: Some(output_dir.to_path_buf()),
        no_hub: true,
        ..Default::default()
    }
}

#[test]
fn simple_log_statistics() {
    let analysis = Analysis::scan(SIMPLE_LOG);

    assert_eq!(analysis.total_lines, 5);
    assert_eq!(analysis.line_stats.levels.get(LogLevel::Error.as_str()), 1);
    assert_eq!(analysis.line_stats.levels.get(LogLevel::Info.as_str()), 4);

    // All five timestamps fall into the same hourly bucket
    assert_eq!(analysis.line_stats.hourly.len(), 1);
    assert_eq!(analysis.line_stats.hourly.values().sum::<usize>(), 5);

    assert_eq!(analysis.token_stats.counts.get("NullPointerException"), 1);
    assert!(!analysis.has_traces());
}

#[tokio::test]
async fn simple_log_report_document() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("app.log");
    fs::write(&log, SIMPLE_LOG).unwrap();
    let reports = dir.path().join("reports");

    let path = run_analysis(&opts(&log, &reports), &Settings::default())
        .await
        .unwrap();

    let doc = fs::read_to_string(&path).unwrap();
    assert!(doc.contains("# Log Analysis Report for"));
    assert!(doc.contains("- ERROR: 1"));
    assert!(doc.contains("- INFO: 4"));
    assert!(doc.contains("- 2024-01-01 10:00: 5"));
    assert!(doc.contains("| NullPointerException | 1 |"));

    // No trace markers, so no per-convention sections
    assert!(!doc.contains("Stack Traces"));
}

#[tokio::test]
async fn unreadable_input_produces_error_only_report() {
    let dir = TempDir::new().unwrap();
    let reports = dir.path().join("reports");

    let path = run_analysis(
        &opts(dir.path().join("does_not_exist.log"), &reports),
        &Settings::default(),
    )
    .await
    .unwrap();

    let doc = fs::read_to_string(&path).unwrap();
    assert!(doc.starts_with("# Error\n"));
    assert!(!doc.contains("Histogram"));
    assert!(!doc.contains("Summary"));
}

#[tokio::test]
async fn python_trace_with_local_source_snippets() {
    let dir = TempDir::new().unwrap();

    // Local checkout providing the file named in the trace
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("app")).unwrap();
    let source_body: String = (1..=30).map(|i| format!("line {}\n", i)).collect();
    fs::write(src.join("app/server.py"), source_body).unwrap();

    let log = dir.path().join("app.log");
    fs::write(
        &log,
        "\
2024-01-01 10:00:00 ERROR request failed
Traceback (most recent call last):
  File \"app/server.py\", line 12, in handle
    do_work()
ValueError: bad input
",
    )
    .unwrap();

    let reports = dir.path().join("reports");
    let mut options = opts(&log, &reports);
    options.source_dir = Some(src);

    let path = run_analysis(&options, &Settings::default()).await.unwrap();
    let doc = fs::read_to_string(&path).unwrap();

    assert!(doc.contains("## Python Stack Traces"));
    assert!(doc.contains("Traceback (most recent call last):"));
    assert!(doc.contains("Source for `app/server.py:12`:"));
    // The +-5 window around line 12
    assert!(doc.contains("| line 7"));
    assert!(doc.contains("| line 17"));
    assert!(!doc.contains("| line 18"));
}

#[test]
fn mixed_conventions_segment_independently() {
    let log = "\
Traceback (most recent call last):
  File \"app.py\", line 3, in main
    run()
RuntimeError: boom

java.lang.IllegalStateException: broken
    at com.acme.Widget.run(Widget.java:42)

TypeError: Cannot read properties of undefined
    at handle (/srv/app/index.js:8:3)
";
    let analysis = Analysis::scan(log);

    assert_eq!(analysis.traces_for(TraceConvention::Python).len(), 1);
    // The java segmenter claims the java block; the node segmenter also
    // opens on bare `SomeError:` lines like the python closer, so counts
    // overlap rather than partition
    assert!(!analysis.traces_for(TraceConvention::Java).is_empty());
    assert!(!analysis.traces_for(TraceConvention::NodeJs).is_empty());

    let traces = analysis.traces_for(TraceConvention::Python);
    let python = traces[0];
    assert_eq!(python.frames.len(), 1);
    assert_eq!(python.frames[0].file, "app.py");
    assert_eq!(python.frames[0].line, 3);
}

#[tokio::test]
async fn report_overwrites_previous_run_for_same_log() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("app.log");
    let reports = dir.path().join("reports");

    fs::write(&log, "ERROR TimeoutError: first\n").unwrap();
    let first = run_analysis(&opts(&log, &reports), &Settings::default())
        .await
        .unwrap();

    fs::write(&log, "ERROR ValueError: second\n").unwrap();
    let second = run_analysis(&opts(&log, &reports), &Settings::default())
        .await
        .unwrap();

    assert_eq!(first, second);
    let doc = fs::read_to_string(&second).unwrap();
    assert!(doc.contains("ValueError"));
    assert!(!doc.contains("TimeoutError"));
}

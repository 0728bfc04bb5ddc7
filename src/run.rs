//! Analysis run orchestration.
//!
//! Wires the pipeline end to end: read the log, scan it, gather code
//! context, discover a cached report, attach hub collaborators, assemble
//! the report document, and write it next to previous runs. An unreadable
//! input produces an error-only report at the same destination rather
//! than a process failure.

use std::path::{Path, PathBuf};

use tracehound_collab::{DirFetcher, GithubContext, HubClient};
use tracehound_core::prelude::*;
use tracehound_core::report::{error_report, ReportAssembler};
use tracehound_core::{Analysis, CodeContextProvider};

use crate::config::Settings;

/// Inputs for one analysis run, resolved from CLI arguments
#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    /// Log file to analyze
    pub log_path: PathBuf,

    /// Override for the configured GitHub repo
    pub repo: Option<String>,

    /// Override for the configured report directory
    pub output_dir: Option<PathBuf>,

    /// Explicit cached report; otherwise the newest prior report in the
    /// output directory is used
    pub cached_report: Option<PathBuf>,

    /// Local checkout to resolve trace snippets against; takes precedence
    /// over GitHub context
    pub source_dir: Option<PathBuf>,

    /// Skip the hub collaborators even when configured
    pub no_hub: bool,
}

/// Run one analysis and write the report. Returns the report path.
pub async fn run_analysis(opts: &AnalyzeOptions, settings: &Settings) -> Result<PathBuf> {
    let output_dir = opts
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.report.output_dir.clone());
    std::fs::create_dir_all(&output_dir)?;

    let report_path = output_dir.join(report_filename(&opts.log_path));

    let text = match std::fs::read_to_string(&opts.log_path) {
        Ok(text) => text,
        Err(e) => {
            // Unreadable input still yields a report document
            let err = Error::input(&opts.log_path, e.to_string());
            error!("{}", err);
            std::fs::write(&report_path, error_report(&err))?;
            return Ok(report_path);
        }
    };

    let analysis = Analysis::scan(&text);
    info!(
        lines = analysis.total_lines,
        qualifying = analysis.token_stats.qualifying_lines.len(),
        traces = analysis.traces.len(),
        "scanned {:?}",
        opts.log_path
    );

    let context = build_context(opts, settings).await;
    let cached = load_cached_report(opts, &output_dir, &report_path);

    let hub = if opts.no_hub {
        None
    } else {
        hub_client(settings)
    };

    let assembler = ReportAssembler {
        log_path: &opts.log_path,
        analysis: &analysis,
        context: &context,
        cached_report: cached.as_deref(),
        summary: hub.as_ref(),
        patch: hub.as_ref(),
    };
    let report = assembler.assemble().await;

    std::fs::write(&report_path, report.render())?;
    info!("report written to {:?}", report_path);
    Ok(report_path)
}

/// Reports are named after the analyzed file so successive runs against
/// the same log overwrite each other.
fn report_filename(log_path: &Path) -> String {
    let basename = log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    format!("log_report_{}.md", basename)
}

/// Resolve the code-context provider: a local checkout wins, then a
/// configured GitHub repo, otherwise no context. GitHub failures degrade
/// to no context.
async fn build_context(opts: &AnalyzeOptions, settings: &Settings) -> CodeContextProvider {
    if let Some(dir) = &opts.source_dir {
        return CodeContextProvider::Fetcher(Box::new(DirFetcher::new(dir)));
    }

    let repo = opts.repo.as_ref().or(settings.github.repo.as_ref());
    let (Some(repo), Some(token)) = (repo, settings.github.token.as_ref()) else {
        return CodeContextProvider::Absent;
    };

    let github = GithubContext::new(token);
    match github.fetch_bundle(repo).await {
        Ok(bundle) => CodeContextProvider::Bundle(bundle),
        Err(e) => {
            warn!("code context fetch failed for {}: {}", repo, e);
            CodeContextProvider::Absent
        }
    }
}

/// Read the explicit cached report, or discover the newest prior
/// `log_report_*.md` in the output directory. The report being written
/// this run is never its own cache.
fn load_cached_report(
    opts: &AnalyzeOptions,
    output_dir: &Path,
    current: &Path,
) -> Option<String> {
    let path = match &opts.cached_report {
        Some(explicit) => Some(explicit.clone()),
        None => find_latest_report(output_dir, current),
    }?;

    match std::fs::read_to_string(&path) {
        Ok(text) => {
            debug!("using cached report {:?}", path);
            Some(text)
        }
        Err(e) => {
            warn!("failed to read cached report {:?}: {}", path, e);
            None
        }
    }
}

fn find_latest_report(output_dir: &Path, current: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(output_dir).ok()?;

    let mut candidates: Vec<(std::time::SystemTime, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let name = path.file_name()?.to_str()?;
            if !name.starts_with("log_report_") || !name.ends_with(".md") || path == current {
                return None;
            }
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, path))
        })
        .collect();

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    candidates.into_iter().map(|(_, path)| path).next()
}

fn hub_client(settings: &Settings) -> Option<HubClient> {
    let url = settings.hub.url.as_ref()?;
    let api_key = settings.hub.api_key.clone().unwrap_or_default();
    Some(HubClient::new(url, api_key))
}

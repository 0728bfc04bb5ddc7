//! Remote log watcher.
//!
//! A single long-lived task polls a remote log source on a fixed interval,
//! filters fetched lines to new error/warning hits, and appends them
//! verbatim to a persistent artifact file. Fetch failures are logged and
//! the loop continues; cancellation is observed at the top of the next
//! iteration at latest and never truncates an in-flight append.
//!
//! The de-dup set lives in memory only and grows for the lifetime of one
//! run; a restart re-scans and may re-append lines already in the
//! artifact. One watcher per artifact is the caller's responsibility.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use tracehound_collab::RemoteLogSource;
use tracehound_core::prelude::*;

/// Fixed poll interval between remote fetches
pub const POLL_INTERVAL_SECS: u64 = 10;

/// Title line written when the artifact file is created
pub const ARTIFACT_TITLE: &str = "# Watched Errors/Warnings";

/// Watcher qualifying rule: lines mentioning errors or warnings
/// (case-insensitive substring; narrower than the analysis token rule).
fn is_watch_hit(line: &str) -> bool {
    let lowered = line.to_lowercase();
    lowered.contains("error") || lowered.contains("warning")
}

/// Per-run watcher state: lines already appended to the artifact.
/// Never evicted; not persisted across runs.
#[derive(Debug, Default)]
pub struct WatcherState {
    seen: HashSet<String>,
}

impl WatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Manages the background polling task for one artifact
pub struct LogWatcher {
    /// Artifact file new hits are appended to
    artifact_path: PathBuf,

    /// Handle to stop the watcher
    stop_tx: Option<oneshot::Sender<()>>,

    /// Join handle for prompt shutdown
    task: Option<JoinHandle<()>>,
}

impl LogWatcher {
    /// Create a watcher for the given artifact path
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            stop_tx: None,
            task: None,
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Start polling `source`; fails if already running
    pub fn start<S>(&mut self, source: S) -> Result<()>
    where
        S: RemoteLogSource + Send + Sync + 'static,
    {
        if self.is_running() {
            return Err(Error::config("watcher is already running"));
        }

        let artifact_path = self.artifact_path.clone();
        let (stop_tx, stop_rx) = oneshot::channel();
        self.stop_tx = Some(stop_tx);

        self.task = Some(tokio::spawn(async move {
            run_watcher(source, artifact_path, stop_rx).await;
        }));

        Ok(())
    }

    /// Signal the watcher to stop at its next suspension point
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Signal stop and wait for the task to finish
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Check if the watcher is running
    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }
}

impl Drop for LogWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The polling loop. The first poll happens immediately on start.
async fn run_watcher<S>(source: S, artifact_path: PathBuf, mut stop_rx: oneshot::Receiver<()>)
where
    S: RemoteLogSource + Send + Sync,
{
    if let Err(e) = ensure_artifact(&artifact_path) {
        error!("failed to create watch artifact {:?}: {}", artifact_path, e);
        return;
    }

    let mut state = WatcherState::new();
    let mut interval = tokio::time::interval(Duration::from_secs(POLL_INTERVAL_SECS));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    info!("log watcher started, artifact: {:?}", artifact_path);

    loop {
        tokio::select! {
            _ = &mut stop_rx => {
                info!("log watcher stopping");
                break;
            }
            _ = interval.tick() => {
                match poll_cycle(&source, &mut state, &artifact_path).await {
                    Ok(appended) if appended > 0 => {
                        info!("appended {} new error/warning line(s)", appended);
                    }
                    Ok(_) => debug!("no new error/warning lines"),
                    // Fetch failures are recoverable; keep polling
                    Err(e) => warn!("log poll failed: {}", e),
                }
            }
        }
    }
}

/// One fetch-filter-append cycle. Returns the number of lines appended.
///
/// Factored out of the loop so tests can drive cycles without timers.
pub async fn poll_cycle<S>(
    source: &S,
    state: &mut WatcherState,
    artifact_path: &Path,
) -> Result<usize>
where
    S: RemoteLogSource + Sync,
{
    let text = source.fetch_text().await?;

    let mut appended = 0;
    for line in text.lines() {
        if !is_watch_hit(line) || state.seen.contains(line) {
            continue;
        }
        append_line(artifact_path, line)?;
        state.seen.insert(line.to_string());
        appended += 1;
    }
    Ok(appended)
}

/// Create the artifact with its title line if it does not exist yet
pub fn ensure_artifact(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, format!("{}\n", ARTIFACT_TITLE))?;
    Ok(())
}

/// Append one raw line; the write is flushed before returning so a stop
/// signal can never truncate it.
fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves a fixed sequence of fetch results, then repeats the last
    struct ScriptedSource {
        responses: Mutex<Vec<Result<String>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl RemoteLogSource for ScriptedSource {
        async fn fetch_text(&self) -> Result<String> {
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                match responses.first() {
                    Some(Ok(text)) => Ok(text.clone()),
                    _ => Err(Error::transport("scripted failure")),
                }
            }
        }
    }

    fn artifact_in(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("watched_errors.log")
    }

    #[test]
    fn test_watch_hit_rule() {
        assert!(is_watch_hit("ERROR boom"));
        assert!(is_watch_hit("deprecation Warning issued"));
        // Unlike the analysis token rule, bare exceptions do not qualify
        assert!(!is_watch_hit("unhandled exception"));
        assert!(!is_watch_hit("all fine"));
    }

    #[tokio::test]
    async fn test_same_text_twice_appends_once() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_in(&dir);
        ensure_artifact(&artifact).unwrap();

        let text = "INFO fine\nERROR first\nwarning: second".to_string();
        let source = ScriptedSource::new(vec![Ok(text)]);
        let mut state = WatcherState::new();

        let first = poll_cycle(&source, &mut state, &artifact).await.unwrap();
        let second = poll_cycle(&source, &mut state, &artifact).await.unwrap();
        assert_eq!(first, 2);
        assert_eq!(second, 0);

        let content = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(content.matches("ERROR first").count(), 1);
        assert_eq!(content.matches("warning: second").count(), 1);
        assert_eq!(state.seen_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_in(&dir);
        ensure_artifact(&artifact).unwrap();

        let source = ScriptedSource::new(vec![
            Err(Error::transport("scripted failure")),
            Ok("ERROR after outage".to_string()),
        ]);
        let mut state = WatcherState::new();

        assert!(poll_cycle(&source, &mut state, &artifact).await.is_err());
        let appended = poll_cycle(&source, &mut state, &artifact).await.unwrap();
        assert_eq!(appended, 1);
    }

    #[tokio::test]
    async fn test_artifact_title_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_in(&dir);

        ensure_artifact(&artifact).unwrap();
        ensure_artifact(&artifact).unwrap();

        let content = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(content.matches(ARTIFACT_TITLE).count(), 1);
        assert!(content.starts_with(ARTIFACT_TITLE));
    }

    #[tokio::test]
    async fn test_start_stop_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = artifact_in(&dir);

        let mut watcher = LogWatcher::new(&artifact);
        assert!(!watcher.is_running());

        let source = ScriptedSource::new(vec![Ok("ERROR once".to_string())]);
        watcher.start(source).unwrap();
        assert!(watcher.is_running());

        // The first poll fires immediately; give the task a beat
        tokio::time::sleep(Duration::from_millis(50)).await;
        watcher.shutdown().await;
        assert!(!watcher.is_running());

        let content = std::fs::read_to_string(&artifact).unwrap();
        assert!(content.starts_with(ARTIFACT_TITLE));
        assert!(content.contains("ERROR once"));
    }

    #[tokio::test]
    async fn test_double_start_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = LogWatcher::new(artifact_in(&dir));

        watcher
            .start(ScriptedSource::new(vec![Ok(String::new())]))
            .unwrap();
        let second = watcher.start(ScriptedSource::new(vec![Ok(String::new())]));
        assert!(second.is_err());

        watcher.shutdown().await;
    }

    #[test]
    fn test_stop_before_start_is_safe() {
        let mut watcher = LogWatcher::new("/tmp/unused");
        watcher.stop();
        assert!(!watcher.is_running());
    }
}

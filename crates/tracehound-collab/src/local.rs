//! Local-directory source fetcher.
//!
//! The fetch-capability form of the code-context provider for the common
//! case where the code that produced the log is checked out locally.

use std::path::{Path, PathBuf};

use tracing::debug;

use tracehound_core::SourceFetcher;

/// Resolves trace file paths against a local directory root.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceFetcher for DirFetcher {
    fn fetch(&self, path: &str) -> Option<String> {
        // Trace paths may be absolute on the machine that produced the
        // log; resolve them relative to our root either way.
        let relative = path.trim_start_matches('/');
        let candidate = self.root.join(relative);
        match std::fs::read_to_string(&candidate) {
            Ok(content) => Some(content),
            Err(_) => {
                debug!("no local source for {}", path);
                None
            }
        }
    }
}

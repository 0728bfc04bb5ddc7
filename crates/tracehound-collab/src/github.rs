//! GitHub code-context retrieval.
//!
//! Fetches a repository's README and root file listing, then the contents
//! of a bounded number of root source files, producing the static bundle
//! form of the code-context provider. Every partial failure degrades: a
//! missing README becomes `None`, a missing listing becomes an empty file
//! list.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use tracehound_core::{CodeBundle, ContextFile};

use crate::CollabError;

/// Default GitHub REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Per-request timeout
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on root files pulled into a bundle
const MAX_CONTEXT_FILES: usize = 20;

/// Root-file extensions considered source context
const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "rs", "js", "ts", "java", "go", "rb", "c", "h", "cpp", "cs", "kt",
];

/// Accept header that makes contents endpoints return raw text
const RAW_ACCEPT: &str = "application/vnd.github.v3.raw";

/// One entry of a repository contents listing
#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

/// GitHub repository context client
pub struct GithubContext {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl GithubContext {
    /// Create a client against the public GitHub API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    /// Create a client against a custom API base (GitHub Enterprise, tests)
    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("tracehound")
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            client,
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// Fetch README, root file listing, and root source file contents for
    /// `repo` (`owner/name`), producing a [`CodeBundle`].
    pub async fn fetch_bundle(&self, repo: &str) -> Result<CodeBundle, CollabError> {
        let readme = self.fetch_readme(repo).await;
        let files = self.fetch_root_files(repo).await?;

        debug!(
            repo,
            readme = readme.is_some(),
            files = files.len(),
            "fetched code context bundle"
        );

        Ok(CodeBundle { readme, files })
    }

    /// Fetch the repository README as raw text; missing or non-success
    /// responses degrade to `None`.
    async fn fetch_readme(&self, repo: &str) -> Option<String> {
        let url = format!("{}/repos/{}/readme", self.api_base, repo);
        match self.get_raw(&url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(repo, "README fetch failed: {}", e);
                None
            }
        }
    }

    /// List root entries and pull the contents of recognized source files
    async fn fetch_root_files(&self, repo: &str) -> Result<Vec<ContextFile>, CollabError> {
        let url = format!("{}/repos/{}/contents", self.api_base, repo);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(repo, status = response.status().as_u16(), "contents listing failed");
            return Ok(Vec::new());
        }

        let entries: Vec<ContentsEntry> = response
            .json()
            .await
            .map_err(|e| CollabError::InvalidResponse(e.to_string()))?;

        let mut files = Vec::new();
        for entry in entries
            .iter()
            .filter(|e| e.entry_type == "file" && is_source_file(&e.name))
            .take(MAX_CONTEXT_FILES)
        {
            match self.fetch_file_content(repo, &entry.path).await {
                Some(content) => files.push(ContextFile::new(&entry.name, content)),
                None => warn!(repo, path = %entry.path, "file content fetch failed"),
            }
        }
        Ok(files)
    }

    /// Fetch the content of a specific file as raw text
    pub async fn fetch_file_content(&self, repo: &str, file_path: &str) -> Option<String> {
        let url = format!("{}/repos/{}/contents/{}", self.api_base, repo, file_path);
        self.get_raw(&url).await.ok()
    }

    async fn get_raw(&self, url: &str) -> Result<String, CollabError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", RAW_ACCEPT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollabError::status(status.as_u16(), url));
        }
        Ok(response.text().await?)
    }
}

fn is_source_file(name: &str) -> bool {
    name.rsplit('.')
        .next()
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

//! LLM hub client: summary and patch-suggestion collaborators.
//!
//! Implements the core's collaborator contracts against an HTTP
//! text-generation service. Per the boundary contract, failures never
//! propagate as errors; each call either returns the generated text or a
//! descriptive inline placeholder, and the per-call timeout is applied
//! here.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use tracehound_core::report::{PatchCollaborator, SummaryCollaborator};
use tracehound_core::ContextFile;

use crate::CollabError;

/// Per-call timeout for summarization
pub const SUMMARY_TIMEOUT_SECS: u64 = 60;

/// Per-call timeout for patch suggestion
pub const PATCH_TIMEOUT_SECS: u64 = 90;

#[derive(Serialize)]
struct SummaryRequest<'a> {
    findings: &'a str,
    cached_report: &'a str,
}

#[derive(Serialize)]
struct PatchRequest<'a> {
    error_line: &'a str,
    files: Vec<FilePayload<'a>>,
}

#[derive(Serialize)]
struct FilePayload<'a> {
    filename: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct HubResponse {
    text: String,
}

/// Client for the LLM text-generation hub
pub struct HubClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HubClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn post_text<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        timeout: Duration,
    ) -> Result<String, CollabError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollabError::status(status.as_u16(), url));
        }

        let parsed: HubResponse = response
            .json()
            .await
            .map_err(|e| CollabError::InvalidResponse(e.to_string()))?;
        Ok(parsed.text)
    }
}

impl SummaryCollaborator for HubClient {
    async fn summarize(&self, findings: &str, cached_report: &str) -> String {
        let body = SummaryRequest {
            findings,
            cached_report,
        };
        match self
            .post_text(
                "/api/summary",
                &body,
                Duration::from_secs(SUMMARY_TIMEOUT_SECS),
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("summary collaborator failed: {}", e);
                format!("(summary unavailable: {})", e)
            }
        }
    }
}

impl PatchCollaborator for HubClient {
    async fn suggest_patch(&self, error_line: &str, files: &[ContextFile]) -> String {
        let body = PatchRequest {
            error_line,
            files: files
                .iter()
                .map(|f| FilePayload {
                    filename: &f.filename,
                    content: &f.content,
                })
                .collect(),
        };
        match self
            .post_text("/api/patch", &body, Duration::from_secs(PATCH_TIMEOUT_SECS))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("patch collaborator failed: {}", e);
                format!("(patch suggestion unavailable: {})", e)
            }
        }
    }
}

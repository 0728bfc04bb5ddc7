//! # tracehound-collab - External Collaborator Clients
//!
//! The analysis core treats every remote service as a request/response
//! collaborator specified only at its boundary. This crate provides the
//! concrete clients:
//!
//! - [`GithubContext`] - repository README/file retrieval, producing the
//!   static [`CodeBundle`] form of the code-context provider
//! - [`HubClient`] - LLM text-generation service implementing the core's
//!   summary and patch collaborator contracts
//! - [`RemoteLogSource`] / [`HttpLogSource`] - plain-text remote log
//!   fetching used by the watcher
//! - [`DirFetcher`] - local-directory implementation of the fetch
//!   capability form of the code-context provider
//!
//! [`CodeBundle`]: tracehound_core::CodeBundle

pub mod github;
pub mod llm;
pub mod local;
pub mod remote;

use thiserror::Error;

pub use github::GithubContext;
pub use llm::HubClient;
pub use local::DirFetcher;
pub use remote::{HttpLogSource, RemoteLogSource};

/// Errors that can occur while talking to collaborator services
#[derive(Debug, Error)]
pub enum CollabError {
    /// Network or protocol failure from the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from a collaborator endpoint
    #[error("unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl CollabError {
    pub fn status(status: u16, endpoint: impl Into<String>) -> Self {
        Self::Status {
            status,
            endpoint: endpoint.into(),
        }
    }
}

//! Configuration types for tracehound
//!
//! Defines `Settings` and its sections as stored in
//! `.tracehound/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application settings (.tracehound/config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub github: GithubSettings,

    #[serde(default)]
    pub hub: HubSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

/// GitHub code-context settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GithubSettings {
    /// API token; the GITHUB_TOKEN env var takes precedence
    #[serde(default)]
    pub token: Option<String>,

    /// Repository to pull code context from, as `owner/name`
    #[serde(default)]
    pub repo: Option<String>,
}

/// LLM hub settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HubSettings {
    /// Base URL of the text-generation hub; unset disables the
    /// summary and patch collaborators
    #[serde(default)]
    pub url: Option<String>,

    /// Bearer token; the THOUND_HUB_API_KEY env var takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Report output settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportSettings {
    /// Directory reports are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Settings {
    /// True when both a hub URL and an API key are available
    pub fn hub_configured(&self) -> bool {
        self.hub.url.is_some() && self.hub.api_key.is_some()
    }

    /// True when both a GitHub repo and token are available
    pub fn github_configured(&self) -> bool {
        self.github.repo.is_some() && self.github.token.is_some()
    }
}

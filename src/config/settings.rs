//! Settings loader for .tracehound/config.toml

use super::types::Settings;
use std::path::Path;

use tracehound_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const THOUND_DIR: &str = ".tracehound";

/// Load settings from .tracehound/config.toml under `base_path`, then
/// apply environment overrides.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(base_path: &Path) -> Settings {
    let config_path = base_path.join(THOUND_DIR).join(CONFIG_FILENAME);

    let mut settings = if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        Settings::default()
    } else {
        match std::fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    debug!("Loaded settings from {:?}", config_path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", config_path, e);
                    Settings::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", config_path, e);
                Settings::default()
            }
        }
    };

    apply_env_overrides(&mut settings);
    settings
}

/// Environment variables take precedence over the config file so tokens
/// can stay out of it.
fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        if !token.is_empty() {
            settings.github.token = Some(token);
        }
    }
    if let Ok(url) = std::env::var("THOUND_HUB_URL") {
        if !url.is_empty() {
            settings.hub.url = Some(url);
        }
    }
    if let Ok(key) = std::env::var("THOUND_HUB_API_KEY") {
        if !key.is_empty() {
            settings.hub.api_key = Some(key);
        }
    }
}

/// Create a default config file in the .tracehound/ directory
pub fn init_config_dir(base_path: &Path) -> Result<()> {
    let thound_dir = base_path.join(THOUND_DIR);

    if !thound_dir.exists() {
        std::fs::create_dir_all(&thound_dir)
            .map_err(|e| Error::config(format!("Failed to create .tracehound dir: {}", e)))?;
    }

    let config_path = thound_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# tracehound configuration

[github]
# token = ""            # Prefer the GITHUB_TOKEN env var
# repo = "owner/name"   # Repository to pull code context from

[hub]
# url = ""              # LLM hub base URL; unset disables summaries/patches
# api_key = ""          # Prefer the THOUND_HUB_API_KEY env var

[report]
output_dir = "reports"
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
    }

    Ok(())
}

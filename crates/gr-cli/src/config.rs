//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GitHub REST API.
    pub api_url: String,

    /// Days of history to analyze when --since is not given.
    pub default_since_days: u32,

    /// Automation logins excluded from aggregate stats (case-insensitive).
    pub bot_logins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: gr_github::Client::default_api_url().to_string(),
            default_since_days: 90,
            bot_logins: vec![
                "coderabbitai[bot]".to_string(),
                "dependabot[bot]".to_string(),
                "github-actions[bot]".to_string(),
                "renovate[bot]".to_string(),
                "mend[bot]".to_string(),
                "codecov-commenter".to_string(),
            ],
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Layering: defaults, then the platform config file, then `config_path`
    /// when given, then `GHR_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("GHR_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for gh-reactions.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gh-reactions"))
}

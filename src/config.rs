use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = ".pr-metrics.toml";
pub const DEFAULT_GH_COMMAND: &str = "gh";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .pr-metrics.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub CLI settings
    #[serde(default)]
    pub gh: GhConfig,

    /// Report rendering defaults
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GhConfig {
    /// Executable to run. Defaults to `gh` on PATH.
    pub command: Option<String>,
    /// Repository passed as `--repo`. If None, falls back to GH_REPO env var.
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    /// Append the event timeline to the markdown report
    #[serde(default)]
    pub timeline: bool,
}

impl Config {
    /// Load configuration from .pr-metrics.toml in the current directory.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve how `gh` is invoked. Each setting takes the first non-empty
    /// value of: CLI flag, config file, environment (`GH_REPO`, repo only),
    /// built-in default.
    pub fn resolve_gh(&self, command_flag: Option<String>, repo_flag: Option<String>) -> GhSettings {
        self.resolve_gh_with_env(command_flag, repo_flag, std::env::var("GH_REPO").ok())
    }

    fn resolve_gh_with_env(
        &self,
        command_flag: Option<String>,
        repo_flag: Option<String>,
        env_repo: Option<String>,
    ) -> GhSettings {
        let command = command_flag
            .filter(|value| non_empty(value))
            .or_else(|| self.gh.command.clone().filter(|value| non_empty(value)))
            .unwrap_or_else(|| DEFAULT_GH_COMMAND.to_string());
        let repo = repo_flag
            .filter(|value| non_empty(value))
            .or_else(|| self.gh.repo.clone().filter(|value| non_empty(value)))
            .or_else(|| env_repo.filter(|value| non_empty(value)));
        GhSettings { command, repo }
    }
}

/// Resolved `gh` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhSettings {
    pub command: String,
    pub repo: Option<String>,
}

fn non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Where the chat store listens when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Settings for the terminal client.
///
/// Resolution order: command line / environment, config file, defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub show_timestamps: bool,
    /// REPL history; `None` keeps history in memory only
    pub history_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            show_timestamps: true,
            history_file: default_dir().map(|dir| dir.join("history.txt")),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: ClientConfig =
            toml::from_str(contents).context("Failed to parse configuration")?;
        config.server_url = normalize_server_url(&config.server_url);
        Ok(config)
    }

    /// Read `path`, or the default location when `path` is `None`.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_dir() {
                Some(dir) => (dir.join("config.toml"), false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Apply command line and environment overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.server_url {
            self.server_url = normalize_server_url(url);
        }
        if cli.no_timestamps {
            self.show_timestamps = false;
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::load(cli.config.as_deref())?;
        config.apply_cli(cli);
        Ok(config)
    }
}

/// Per-user directory (~/.chatdesk)
pub fn default_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(|home| PathBuf::from(home).join(".chatdesk"))
}

/// Trim, drop trailing slashes and default to `http://` when no scheme is given
pub fn normalize_server_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

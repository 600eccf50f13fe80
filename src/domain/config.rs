//! # Configuration
//!
//! Loads the optional `config.yaml`. Every field has a default, so a missing
//! file (or a file naming only a few sections) is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5002
}

/// How bash blocks are run.
#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    #[serde(default = "default_shell")]
    pub shell: String,
    /// Directory commands run in and relative paths resolve against.
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Seconds to wait for a bash block. Absent means wait until it exits.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            working_dir: None,
            timeout: None,
        }
    }
}

fn default_shell() -> String {
    "sh".to_string()
}

impl CommandsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// `working_dir` with a leading `~/` expanded.
    pub fn working_dir(&self) -> Option<PathBuf> {
        self.working_dir.as_deref().map(expand_home)
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct FilesConfig {
    /// Prefix every line of file reads with its line number.
    #[serde(default)]
    pub number_lines: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file: default_log_file(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_dir() -> String {
    "data".to_string()
}
fn default_log_file() -> String {
    "session.log".to_string()
}
fn default_log_filter() -> String {
    "info,tower_http=info,hyper=warn".to_string()
}

impl AppConfig {
    /// Reads `path`; a missing or empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

//! Optional TOML configuration.
//!
//! Looked up at `--config <path>` or in the platform config directory
//! (`config.toml`). Command line flags and environment variables override the
//! file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::Deserialize;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub email: Option<String>,
}

impl FileConfig {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "campaign", "campaign-intake")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads `explicit` when given, else the default location if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }
}

/// Effective settings after flags, environment and file are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub timeout: Duration,
    pub email: Option<String>,
}

impl Settings {
    pub fn resolve(api_url: Option<String>, email: Option<String>, file: FileConfig) -> Result<Self> {
        let Some(api_url) = api_url.or(file.api_url).filter(|url| !url.trim().is_empty()) else {
            bail!("no API URL configured; pass --api-url, set CAMPAIGN_API_URL or add api_url to the config file");
        };
        Ok(Self {
            api_url,
            timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            email: email.or(file.email),
        })
    }

    pub fn require_email(&self) -> Result<&str> {
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => Ok(email),
            _ => bail!("no email given; pass --email, set CAMPAIGN_EMAIL or add email to the config file"),
        }
    }
}

//! Configuration management using the prefer crate.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::ClientOptions;
use crate::services::{Endpoints, Locale};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default bound for each edit-screen fetch, in seconds.
pub const DEFAULT_BRANCH_TIMEOUT_SECS: u64 = 20;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },
    #[error("{0} is not configured (set it in the config file, the environment or on the command line)")]
    Missing(&'static str),
    #[error("Invalid {key}: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
}

/// File configuration, before environment and command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the lead unit and budget endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Base URL of the organization directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Per-branch timeout for the edit-screen fetch, in seconds. 0 disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_timeout_secs: Option<u64>,
    /// Message language: `en` or `vi`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Where downloaded workbooks are written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, discovering `leadunit.{toml,yaml,json}` in the
    /// standard locations. Falls back to defaults when nothing is found.
    pub async fn load() -> Self {
        match prefer::load("leadunit").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config file {}: {}", path.display(), e);
                        Self::default().with_env_overrides()
                    }
                },
                None => Self::default().with_env_overrides(),
            },
            Err(_) => Self::default().with_env_overrides(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format is chosen by extension; anything unknown is read as JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config.with_env_overrides())
    }

    fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                reason: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                reason: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                reason: e.to_string(),
            }),
        }
    }

    /// Apply `LEADUNIT_*` environment variables.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get("LEADUNIT_API_URL") {
            self.api_url = Some(url);
        }
        if let Some(url) = get("LEADUNIT_ADMIN_URL") {
            self.admin_url = Some(url);
        }
        if let Some(secs) = get("LEADUNIT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = Some(secs);
        }
        if let Some(secs) = get("LEADUNIT_BRANCH_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.branch_timeout_secs = Some(secs);
        }
        if let Some(locale) = get("LEADUNIT_LOCALE") {
            self.locale = Some(locale);
        }
        if let Some(dir) = get("LEADUNIT_EXPORT_DIR") {
            self.export_dir = Some(dir);
        }
        if let Some(token) = get("LEADUNIT_TOKEN") {
            self.token = Some(token);
        }
        self
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Validated base URLs.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        Ok(Endpoints {
            api_url: validate_url("api_url", self.api_url.as_deref())?,
            admin_url: validate_url("admin_url", self.admin_url.as_deref())?,
        })
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            user_agent: self.user_agent.clone(),
            bearer_token: self.token.clone(),
        }
    }

    /// `None` when the bound is disabled with 0.
    pub fn branch_timeout(&self) -> Option<Duration> {
        match self
            .branch_timeout_secs
            .unwrap_or(DEFAULT_BRANCH_TIMEOUT_SECS)
        {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .and_then(Locale::from_str)
            .unwrap_or_default()
    }

    /// Export directory. Relative paths resolve against the config file;
    /// unset falls back to the user's download directory.
    pub fn export_dir(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => {
                let path = PathBuf::from(dir);
                if path.is_absolute() {
                    path
                } else {
                    self.base_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join(path)
                }
            }
            None => dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

fn validate_url(key: &'static str, value: Option<&str>) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::Missing(key))?;
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            key,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(value.trim_end_matches('/').to_string())
}

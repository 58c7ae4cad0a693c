//! Configuration for the search service.
//!
//! Values are loaded once at startup with priority env vars > TOML
//! file > defaults, then handed to the components that need them.

use crate::error::{ContentError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "REPO_SEARCH_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Location of the searched directory and how to reach it
#[derive(Clone, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_repo")]
    pub repo: String,

    /// Directory inside the repository whose files are searched
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Access token sent as a bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// Branch, tag or commit; the default branch when unset
    #[serde(default)]
    pub git_ref: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_owner() -> String {
    "Zie619".to_string()
}

fn default_repo() -> String {
    "n8n-workflows".to_string()
}

fn default_base_path() -> String {
    "nodes".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            base_path: default_base_path(),
            token: None,
            git_ref: None,
            api_url: default_api_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// Keeps the token out of logs and panics.
impl std::fmt::Debug for RepositoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("base_path", &self.base_path)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("git_ref", &self.git_ref)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| ContentError::InvalidConfig {
            message: format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::default(),
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with process environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| env::var(key).ok());
    }

    /// Merge configuration from an arbitrary variable lookup
    ///
    /// Empty values are ignored, as is a `PORT` that doesn't parse.
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(owner) = get("GITHUB_OWNER") {
            self.repository.owner = owner;
        }
        if let Some(repo) = get("GITHUB_REPO") {
            self.repository.repo = repo;
        }
        if let Some(base_path) = get("GITHUB_BASE_PATH") {
            self.repository.base_path = base_path;
        }
        if let Some(token) = get("GITHUB_TOKEN") {
            self.repository.token = Some(token);
        }
        if let Some(git_ref) = get("GITHUB_REF") {
            self.repository.git_ref = Some(git_ref);
        }
        if let Some(api_url) = get("GITHUB_API_URL") {
            self.repository.api_url = api_url;
        }

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(ContentError::InvalidConfig {
                message: message.to_string(),
            })
        };

        if self.repository.owner.trim().is_empty() {
            return invalid("Repository owner must not be empty");
        }
        if self.repository.repo.trim().is_empty() {
            return invalid("Repository name must not be empty");
        }
        if self.repository.api_url.trim().is_empty() {
            return invalid("API URL must not be empty");
        }
        match reqwest::Url::parse(&self.repository.api_url) {
            Ok(url) if !url.cannot_be_a_base() => {}
            _ => return invalid("API URL must be an absolute URL"),
        }
        if self.server.port == 0 {
            return invalid("Port must be non-zero");
        }

        Ok(())
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        tracing::info!(
            owner = %self.repository.owner,
            repo = %self.repository.repo,
            base_path = %self.repository.base_path,
            git_ref = self.repository.git_ref.as_deref().unwrap_or("<default branch>"),
            api_url = %self.repository.api_url,
            authenticated = self.repository.token.is_some(),
            "Repository configuration"
        );
        tracing::info!(
            host = %self.server.host,
            port = self.server.port,
            "Server configuration"
        );
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

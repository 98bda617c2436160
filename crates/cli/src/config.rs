use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Server configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server name reported during initialization
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// User-Agent header for outgoing fetches
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header for outgoing fetches
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Assistant command argv for the fetch tool's prompt argument
    #[serde(default = "default_assistant_command")]
    pub assistant_command: Vec<String>,
}

fn default_server_name() -> String {
    "pagemark".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_assistant_command() -> Vec<String> {
    vec!["claude".to_string(), "--print".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            request_timeout_secs: default_timeout_secs(),
            assistant_command: default_assistant_command(),
        }
    }
}

impl Config {
    /// Return the default config file path: ~/.config/pagemark/config.toml
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("pagemark");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// Returns default config if the file does not exist.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))?;
            Ok(config)
        } else {
            debug!(?config_path, "No config file, using defaults");
            Ok(Self::default())
        }
    }
}

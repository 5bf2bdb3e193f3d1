//! Service configuration
//!
//! Configuration is built once at startup and handed to each component by
//! value. Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`sprint-planner.toml` unless another path is given)
//! 3. Environment variables (`DEEPSEEK_API_KEY`, `PORT`, ...)
//!
//! The CLI applies its own flags on top of the loaded value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "sprint-planner.toml";

/// DeepSeek completion API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub model: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "deepseek-chat".to_string(),
            base_url: "https://api.deepseek.com".to_string(),
        }
    }
}

/// HTTP listener and storage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            data_file: PathBuf::from("data/team-data.json"),
        }
    }
}

/// Completion request tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AiConfig {
    pub temperature: f32,
    pub max_tokens: u32,

    /// Request timeout; `None` keeps the HTTP client's default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4000,
            timeout_secs: None,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub deepseek: DeepSeekConfig,
    pub server: ServerConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from `path` (or the default file) plus the process
    /// environment. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML config file, returning defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Override fields from environment variables resolved through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DEEPSEEK_API_KEY") {
            self.deepseek.api_key = v;
        }
        if let Some(v) = lookup("DEEPSEEK_MODEL") {
            self.deepseek.model = v;
        }
        if let Some(v) = lookup("DEEPSEEK_BASE_URL") {
            self.deepseek.base_url = v;
        }
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = lookup("DATA_FILE") {
            self.server.data_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("AI_TEMPERATURE") {
            self.ai.temperature = parse_var("AI_TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("AI_MAX_TOKENS") {
            self.ai.max_tokens = parse_var("AI_MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("AI_TIMEOUT_SECS") {
            self.ai.timeout_secs = Some(parse_var("AI_TIMEOUT_SECS", &v)?);
        }
        Ok(())
    }

    /// Copy with the API key masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.deepseek.api_key.is_empty() {
            copy.deepseek.api_key = "********".to_string();
        }
        copy
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: '{}' ({})", name, value, e))
}

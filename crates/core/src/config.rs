//! Runtime configuration
//!
//! Values come from defaults, then the JSON file named by
//! `PROMPT_MANAGER_CONFIG` (if any), then a `.env` file and the other
//! `PROMPT_MANAGER_*` environment variables.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PromptError, Result};

pub const ENV_DB: &str = "PROMPT_MANAGER_DB";
pub const ENV_BIND: &str = "PROMPT_MANAGER_BIND";
pub const ENV_TIMEOUT_MS: &str = "PROMPT_MANAGER_TIMEOUT_MS";
pub const ENV_LOG_FORMAT: &str = "PROMPT_MANAGER_LOG_FORMAT";
pub const ENV_LOCKFILE_DIR: &str = "PROMPT_MANAGER_LOCKFILE_DIR";
pub const ENV_CONFIG_FILE: &str = "PROMPT_MANAGER_CONFIG";

/// Default bound on a single store call
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 5_000;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            other => Err(PromptError::ConfigError(format!(
                "unknown log format '{}' (expected 'plain' or 'json')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path:     PathBuf,
    pub bind_addr:         String,
    pub action_timeout_ms: u64,
    pub log_format:        LogFormat,
    pub lockfile_dir:      PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            database_path:     data_dir.join("prompts.db"),
            bind_addr:         "127.0.0.1:0".to_string(),
            action_timeout_ms: DEFAULT_ACTION_TIMEOUT_MS,
            log_format:        LogFormat::Plain,
            lockfile_dir:      data_dir,
        }
    }
}

/// `<platform data dir>/prompt-manager`, or `./prompt-manager` when the
/// platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prompt-manager")
}

impl Config {
    /// Load from `.env` (if any) and the process environment
    pub fn from_env() -> Result<Self> {
        // A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from defaults plus whatever `lookup` returns for each variable
    ///
    /// A config file is applied first so individual variables still win.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_FILE) {
            Some(path) => Config::default().merge_value(read_json_file(Path::new(&path))?)?,
            None => Config::default(),
        };

        if let Some(path) = lookup(ENV_DB) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(ENV_BIND) {
            config.bind_addr = addr;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.action_timeout_ms = raw.trim().parse().map_err(|_| {
                PromptError::ConfigError(format!("{} must be a number of milliseconds", ENV_TIMEOUT_MS))
            })?;
        }
        if let Some(raw) = lookup(ENV_LOG_FORMAT) {
            config.log_format = raw.parse()?;
        }
        if let Some(dir) = lookup(ENV_LOCKFILE_DIR) {
            config.lockfile_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Overlay the keys present in a JSON object onto this config
    pub fn merge_value(&self, overrides: Value) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;

        match (base.as_object_mut(), overrides) {
            (Some(base_map), Value::Object(extra)) => {
                for (key, value) in extra {
                    base_map.insert(key, value);
                }
            },
            (_, Value::Null) => {},
            _ => {
                return Err(PromptError::ConfigError(
                    "configuration overrides must be a JSON object".into(),
                ))
            },
        }

        let merged: Config = serde_json::from_value(base)
            .map_err(|e| PromptError::ConfigError(e.to_string()))?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.action_timeout_ms == 0 {
            return Err(PromptError::ConfigError(
                "action timeout must be greater than zero".into(),
            ));
        }
        if self.bind_addr.trim().is_empty() {
            return Err(PromptError::ConfigError("bind address must not be empty".into()));
        }
        Ok(())
    }
}

fn read_json_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| {
        PromptError::ConfigError(format!("cannot read {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&text)
        .map_err(|e| PromptError::ConfigError(format!("{} is not valid JSON: {}", path.display(), e)))
}

//! Runtime configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. a TOML file (`--config <path>`, else `prophet.toml` in the working directory)
//! 3. `PROPHET_*` environment variables
//!
//! The API key itself never lives in the file; the file only names the
//! environment variable it is read from.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "prophet.toml";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub narrative: NarrativeConfig,
    pub logging: LoggingConfig,
}

/// Settings for the text-generation service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NarrativeConfig {
    /// Model id, e.g. `gemini-2.0-flash`.
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file. Required for any logging while the TUI owns the terminal.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk and the process environment.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `PROPHET_MODEL`, `PROPHET_BASE_URL` and `PROPHET_LOG`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = non_empty("PROPHET_MODEL") {
            self.narrative.model = model;
        }
        if let Some(base_url) = non_empty("PROPHET_BASE_URL") {
            self.narrative.base_url = base_url;
        }
        if let Some(level) = non_empty("PROPHET_LOG") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.narrative.model.trim().is_empty() {
            return Err(ConfigError::Invalid("narrative.model must not be empty".to_string()));
        }
        if !(self.narrative.base_url.starts_with("http://") || self.narrative.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "narrative.base_url must be an http(s) URL (got '{}')",
                self.narrative.base_url
            )));
        }
        if self.narrative.timeout_secs == 0 {
            return Err(ConfigError::Invalid("narrative.timeout_secs must be positive".to_string()));
        }
        if self.narrative.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid("narrative.api_key_env must not be empty".to_string()));
        }
        Ok(())
    }
}

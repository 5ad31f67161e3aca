//! Configuration infrastructure
//!
//! Application configuration is assembled from an optional file and
//! environment variables prefixed with `SERP_RULES` (nested keys separated by
//! `__`, e.g. `SERP_RULES__LOGGING__LEVEL=debug`), on top of built-in defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::parsing::{ParsingConfig, ParsingError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl From<ParsingError> for ConfigError {
    fn from(err: ParsingError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Selector registry and document settings
    pub parsing: ParsingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Log file name inside `log_dir`
    pub file_name: String,

    /// Module-specific log level filters (e.g., "scraper": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !defaults::LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation {
                message: format!("unknown log level '{}'", self.level),
            });
        }
        if self.file_output && self.file_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "file_name must be set when file_output is enabled".to_string(),
            });
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load from a config file (format picked from its extension) plus environment
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Load from environment and, when given, a config file
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!("Loading configuration from: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(defaults::ENV_PREFIX).separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsing.validate()?;
        self.logging.validate()
    }
}

/// Default configuration values
pub mod defaults {
    /// Page the documents are assumed to come from when none is given
    pub const BASE_URL: &str = "https://www.google.com/";

    /// Top-level result blocks of a search page
    pub const RESULT_CANDIDATES: &str = "#rso > div";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "SERP_RULES";

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "serp-rules.log";
}

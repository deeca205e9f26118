//! Core configuration and paging policy.
//!
//! # Responsibility
//! - Describe storage, logging, liked-collection and paging settings.
//! - Load settings from JSON with environment overrides.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - `validate()` must pass before the config is used to bootstrap services.

use crate::model::collection::LIKED_COLLECTION_NAME;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DB_PATH: &str = "DEALBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "DEALBOOK_LOG_LEVEL";

const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Process-level configuration for the dealbook core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite file path. `None` keeps the database in memory.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    /// Name of the reserved collection used for like/unlike.
    pub liked_collection_name: String,
    pub default_page_limit: u32,
    pub max_page_limit: u32,
    /// Idle timeout for progress sessions; `None` waits indefinitely.
    pub progress_idle_timeout_ms: Option<u64>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
            liked_collection_name: LIKED_COLLECTION_NAME.to_string(),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            progress_idle_timeout_ms: None,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Applies `DEALBOOK_DB_PATH` / `DEALBOOK_LOG_LEVEL` from the process env.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup; blank values are ignored.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(ENV_DB_PATH) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.db_path = Some(PathBuf::from(trimmed));
            }
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.log_level = trimmed.to_string();
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::logging::normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.liked_collection_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "liked_collection_name cannot be empty".to_string(),
            ));
        }
        if self.default_page_limit == 0 || self.max_page_limit == 0 {
            return Err(ConfigError::Invalid(
                "page limits must be at least 1".to_string(),
            ));
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::Invalid(format!(
                "default_page_limit {} exceeds max_page_limit {}",
                self.default_page_limit, self.max_page_limit
            )));
        }
        if self.progress_idle_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "progress_idle_timeout_ms must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_limit,
            max_limit: self.max_page_limit,
        }
    }

    pub fn progress_idle_timeout(&self) -> Option<Duration> {
        self.progress_idle_timeout_ms.map(Duration::from_millis)
    }
}

/// Default and upper bound applied to caller-supplied page limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl PageLimits {
    /// Missing or zero limits fall back to the default; large ones clamp.
    pub fn normalize(&self, limit: Option<u32>) -> u32 {
        match limit {
            Some(0) | None => self.default_limit,
            Some(value) if value > self.max_limit => self.max_limit,
            Some(value) => value,
        }
    }
}

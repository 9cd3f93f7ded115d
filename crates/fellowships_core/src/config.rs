//! Startup configuration shared by catalog loading, queries and reminders.
//!
//! # Responsibility
//! - Replace process-wide lookups with one explicitly constructed value.
//! - Validate externally supplied configuration once, at load time.
//!
//! # Invariants
//! - `bookmark_key` is non-empty.
//! - `reminder_hour` is a valid hour of day (`0..=23`).

use crate::model::scholarship::IdStrategy;
use crate::model::tag::TagCatalog;
use chrono::NaiveTime;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persistence key under which bookmark ids are stored.
pub const DEFAULT_BOOKMARK_KEY: &str = "bookmarked_scholarships";
/// Local hour at which reminders fire.
pub const DEFAULT_REMINDER_HOUR: u32 = 9;

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidValue(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid core config: {err}"),
            Self::InvalidValue(message) => write!(f, "invalid core config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidValue(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Core configuration passed to services at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub tag_catalog: TagCatalog,
    pub id_strategy: IdStrategy,
    pub bookmark_key: String,
    pub reminder_hour: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tag_catalog: TagCatalog::builtin(),
            id_strategy: IdStrategy::default(),
            bookmark_key: DEFAULT_BOOKMARK_KEY.to_string(),
            reminder_hour: DEFAULT_REMINDER_HOUR,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document. Missing fields keep defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bookmark_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "bookmark_key cannot be empty".to_string(),
            ));
        }
        if self.reminder_hour > 23 {
            return Err(ConfigError::InvalidValue(format!(
                "reminder_hour must be 0..=23, got {}",
                self.reminder_hour
            )));
        }
        Ok(())
    }

    /// Local time of day at which reminders fire.
    pub fn reminder_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.reminder_hour, 0, 0)
            .or_else(|| NaiveTime::from_hms_opt(DEFAULT_REMINDER_HOUR, 0, 0))
            .unwrap_or_default()
    }
}

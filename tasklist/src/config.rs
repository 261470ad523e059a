//! Configuration management for the tasklist shell.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Label shown in place of a zero count
pub const DEFAULT_EMPTY_LABEL: &str = "Bo'sh";

/// Errors reading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something unusable
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        /// Environment variable name
        key: &'static str,
        /// Value found
        value: String,
        /// What would have been accepted
        expected: &'static str,
    },
}

/// How the shell renders the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lists
    #[default]
    Text,
    /// One JSON object per render
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Shell configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Shown instead of a count when a list is empty (`TASKLIST_EMPTY_LABEL`)
    pub empty_label: String,
    /// Render format (`TASKLIST_OUTPUT`)
    pub output: OutputFormat,
    /// Start from the example tasks rather than an empty list (`TASKLIST_SEED`)
    pub seed: bool,
    /// Printed before each line is read in text mode (`TASKLIST_PROMPT`)
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            empty_label: DEFAULT_EMPTY_LABEL.to_string(),
            output: OutputFormat::Text,
            seed: true,
            prompt: "> ".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set to a value
    /// that cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a value cannot be used.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let output = match lookup("TASKLIST_OUTPUT") {
            Some(value) => value.parse::<OutputFormat>().map_err(|()| ConfigError::InvalidValue {
                key: "TASKLIST_OUTPUT",
                value,
                expected: "text or json",
            })?,
            None => defaults.output,
        };

        let seed = match lookup("TASKLIST_SEED") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                key: "TASKLIST_SEED",
                value,
                expected: "true or false",
            })?,
            None => defaults.seed,
        };

        Ok(Self {
            empty_label: lookup("TASKLIST_EMPTY_LABEL").unwrap_or(defaults.empty_label),
            output,
            seed,
            prompt: lookup("TASKLIST_PROMPT").unwrap_or(defaults.prompt),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Runtime configuration
//!
//! Environment:
//! - WHITEBOARD_DEFAULT_LANGUAGE: language for users without a preference (default 1)
//! - WHITEBOARD_DEFAULT_BOARD_LABEL: label key naming the default board (default "615")
//! - WHITEBOARD_DEFAULT_BOARD_NAME: name used when the label is missing (default "Whiteboard")
//! - WHITEBOARD_RESTART_POLICY: `overwrite` or `reject` (default overwrite)
//! - WHITEBOARD_BROADCAST_CAPACITY: messages buffered per room subscriber (default 1024)

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::types::LanguageId;

/// What `start` does when the client already holds a live token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPolicy {
    /// Replace the live token with a fresh one
    #[default]
    Overwrite,
    /// Refuse with `AlreadyStarted`
    Reject,
}

impl FromStr for RestartPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overwrite" => Ok(RestartPolicy::Overwrite),
            "reject" => Ok(RestartPolicy::Reject),
            other => Err(ConfigError::Invalid {
                key: "WHITEBOARD_RESTART_POLICY",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_language")]
    pub default_language: LanguageId,

    #[serde(default = "default_board_label")]
    pub default_board_label: String,

    #[serde(default = "default_board_name")]
    pub default_board_name: String,

    #[serde(default)]
    pub restart_policy: RestartPolicy,

    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

impl SyncConfig {
    /// Load configuration from environment variables, defaults for unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("WHITEBOARD_DEFAULT_LANGUAGE") {
            config.default_language = parse("WHITEBOARD_DEFAULT_LANGUAGE", &value)?;
        }
        if let Some(value) = lookup("WHITEBOARD_DEFAULT_BOARD_LABEL") {
            config.default_board_label = value;
        }
        if let Some(value) = lookup("WHITEBOARD_DEFAULT_BOARD_NAME") {
            config.default_board_name = value;
        }
        if let Some(value) = lookup("WHITEBOARD_RESTART_POLICY") {
            config.restart_policy = value.parse()?;
        }
        if let Some(value) = lookup("WHITEBOARD_BROADCAST_CAPACITY") {
            config.broadcast_capacity = parse("WHITEBOARD_BROADCAST_CAPACITY", &value)?;
        }

        info!(
            default_language = config.default_language,
            restart_policy = ?config.restart_policy,
            broadcast_capacity = config.broadcast_capacity,
            "configuration loaded"
        );
        Ok(config)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_board_label: default_board_label(),
            default_board_name: default_board_name(),
            restart_policy: RestartPolicy::default(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

// Default value functions
fn default_language() -> LanguageId {
    1
}

fn default_board_label() -> String {
    "615".to_string()
}

fn default_board_name() -> String {
    "Whiteboard".to_string()
}

fn default_broadcast_capacity() -> usize {
    1024
}

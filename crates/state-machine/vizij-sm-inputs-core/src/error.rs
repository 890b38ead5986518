//! Error types for name sanitizing and configuration loading.
//!
//! None of these reach the host: the bridge logs them and degrades (skips the
//! input, keeps the default config) instead.

use thiserror::Error;

/// Why a raw state-machine input name cannot be exposed as a property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("input name is empty")]
    Empty,
    #[error("'{raw}' is not a valid property name (cleaned to '{cleaned}')")]
    InvalidIdentifier { raw: String, cleaned: String },
    #[error("'{raw}' collides with reserved word '{cleaned}'")]
    Reserved { raw: String, cleaned: String },
}

/// Errors produced while loading a [`crate::BridgeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bridge config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

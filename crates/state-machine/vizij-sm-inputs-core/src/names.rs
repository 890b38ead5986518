//! Name sanitizing and case-folded lookup keys.
//!
//! Animation authors name inputs freely ("Is Jumping", "3d offset"). Only names
//! that can be used as host property identifiers are exposed:
//!
//!   raw name -> first char lower-cased, ' ' -> '_' -> must match
//!   `^[a-z_][0-9a-zA-Z_$]*$` and must not be a reserved word
//!
//! The sanitized form is the display name. Every lookup goes through
//! [`normalize`], so callers may use any casing.

use std::borrow::Borrow;
use std::fmt;

use hashbrown::HashSet;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::BridgeConfig;
use crate::error::NameError;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][0-9a-zA-Z_$]*$").expect("identifier pattern should compile"));

/// Case-folded key used for every internal lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputKey(String);

impl InputKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for InputKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-fold `name` into a lookup key. Pure and total.
pub fn normalize(name: &str) -> InputKey {
    InputKey(name.to_lowercase())
}

/// Sanitizer holding the injected reserved-word set.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    reserved: HashSet<String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::from_config(&BridgeConfig::default())
    }
}

impl NameNormalizer {
    pub fn new<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: reserved.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(cfg: &BridgeConfig) -> Self {
        Self::new(cfg.reserved_words.iter().cloned())
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Turn a raw input name into a display name usable as a property identifier.
    pub fn sanitize(&self, raw: &str) -> Result<String, NameError> {
        let mut chars = raw.chars();
        let first = chars.next().ok_or(NameError::Empty)?;
        let mut cleaned: String = first.to_lowercase().collect();
        cleaned.push_str(chars.as_str());
        let cleaned = cleaned.replace(' ', "_");

        if !IDENTIFIER.is_match(&cleaned) {
            return Err(NameError::InvalidIdentifier {
                raw: raw.to_string(),
                cleaned,
            });
        }
        if self.is_reserved(&cleaned) {
            return Err(NameError::Reserved {
                raw: raw.to_string(),
                cleaned,
            });
        }
        Ok(cleaned)
    }

    /// [`NameNormalizer::sanitize`] for the registry scan: rejections are logged
    /// with the raw name and turned into `None`.
    pub fn display_name(&self, raw: &str) -> Option<String> {
        match self.sanitize(raw) {
            Ok(name) => Some(name),
            Err(err) => {
                debug!(
                    "{:?} is not a valid property name and can not be adjusted to be one, rename it in the animation: {}",
                    raw, err
                );
                None
            }
        }
    }
}

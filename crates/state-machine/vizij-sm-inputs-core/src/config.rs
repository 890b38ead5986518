//! Bridge configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Host-side naming convention for the artboard selection property. The bridge
/// itself exposes no such property; it is reserved so an input can never
/// shadow it on a host that follows the convention.
pub const ARTBOARD_NAME_PROPERTY: &str = "artboardName";
/// Host-side naming convention for the property that publishes
/// [`crate::StateMachineInputs::inputs`]. Reserved for the same reason as
/// [`ARTBOARD_NAME_PROPERTY`]; hosts using other names replace the set through
/// [`BridgeConfig::reserved_words`].
pub const INPUTS_PROPERTY: &str = "stateMachineInputs";

/// Keywords of the embedding scripting environment (ECMAScript reserved and
/// strict-mode future reserved words).
pub const SCRIPT_KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
    "enum",
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
];

/// What to do when two inputs normalize to the same key during one rebuild.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep the input seen first in native order; later ones are skipped.
    #[default]
    FirstWins,
    /// Replace the earlier descriptor; the listing position of the first one is kept.
    LastWins,
}

/// Configuration for name handling and change routing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Names that must never become properties, compared after sanitizing.
    pub reserved_words: Vec<String>,
    /// Suffix that turns a property name into its change-notification name.
    pub changed_suffix: String,
    pub collision_policy: CollisionPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        let mut reserved_words: Vec<String> =
            SCRIPT_KEYWORDS.iter().map(|w| (*w).to_string()).collect();
        reserved_words.push(ARTBOARD_NAME_PROPERTY.to_string());
        reserved_words.push(INPUTS_PROPERTY.to_string());
        Self {
            reserved_words,
            changed_suffix: "Changed".to_string(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl BridgeConfig {
    /// Parse a config from JSON. Missing fields fall back to [`BridgeConfig::default`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builder-style helper that adds words to the reserved-word set. Assign
    /// [`BridgeConfig::reserved_words`] to replace it.
    pub fn extend_reserved<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words.extend(words.into_iter().map(Into::into));
        self
    }
}

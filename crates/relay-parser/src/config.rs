//! Parser configuration

use serde::{Deserialize, Serialize};

/// What to do when a mapping repeats a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// Keep the later value
    LastWins,
    /// Fail with an invalid structure error at the repeated key
    Reject,
}

impl Default for DuplicateKeyPolicy {
    fn default() -> Self {
        Self::LastWins
    }
}

/// Parser configuration
///
/// # Examples
///
/// ```rust
/// use relay_parser::{DuplicateKeyPolicy, ParserConfig};
///
/// // Lenient parsing (default)
/// let config = ParserConfig::default();
///
/// // Reject repeated keys
/// let config = ParserConfig::strict();
/// assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::Reject);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Handling of repeated mapping keys
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ParserConfig {
    /// Configuration that rejects repeated keys
    pub fn strict() -> Self {
        Self {
            duplicate_keys: DuplicateKeyPolicy::Reject,
        }
    }

    /// Builder method to set the duplicate key policy
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

//! Core types for Cohora sessions
//!
//! Defines:
//! - Session configuration
//! - Session identifiers
//! - File actions and the per-turn action set

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use ulid::Ulid;

/// Unique session identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How broadly a detected action authorizes implicit writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicyMode {
    /// A detected action authorizes only blocks for detected filenames
    #[default]
    Strict,
    /// Any detected action authorizes a block for any filename
    Broad,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum file entries kept in the context store
    pub file_context_capacity: usize,
    /// Maximum exchanges kept in the history log
    pub exchange_limit: usize,
    /// Exchanges replayed into each prompt
    pub prompt_history: usize,
    /// Characters of each context file shown in prompts
    pub context_preview_chars: usize,
    /// Minimum trimmed body length for a block to be written
    pub min_block_chars: usize,
    /// Authorization breadth for implicit blocks
    pub write_policy: WritePolicyMode,
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With file context capacity
    #[inline]
    #[must_use]
    pub fn with_file_context_capacity(mut self, capacity: usize) -> Self {
        self.file_context_capacity = capacity;
        self
    }

    /// With exchange limit
    #[inline]
    #[must_use]
    pub fn with_exchange_limit(mut self, limit: usize) -> Self {
        self.exchange_limit = limit;
        self
    }

    /// With write policy mode
    #[inline]
    #[must_use]
    pub fn with_write_policy(mut self, mode: WritePolicyMode) -> Self {
        self.write_policy = mode;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file_context_capacity: 32,
            exchange_limit: 10,
            prompt_history: 3,
            context_preview_chars: 500,
            min_block_chars: 10,
            write_policy: WritePolicyMode::Strict,
        }
    }
}

/// Kind of change a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    /// Bring a new file into existence
    Create,
    /// Change an existing file
    Edit,
    /// Remove a file
    Delete,
}

impl FileAction {
    /// Lowercase tag
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actions detected in one turn
///
/// Ordered and duplicate-free; a message may carry both `create` and `edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet(BTreeSet<FileAction>);

impl ActionSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action
    #[inline]
    pub fn insert(&mut self, action: FileAction) {
        self.0.insert(action);
    }

    /// Check membership
    #[inline]
    #[must_use]
    pub fn contains(&self, action: FileAction) -> bool {
        self.0.contains(&action)
    }

    /// Check if nothing was detected
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in tag order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = FileAction> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<FileAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = FileAction>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none detected");
        }
        let tags: Vec<_> = self.0.iter().map(|a| a.as_str()).collect();
        f.write_str(&tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_set_display() {
        let set: ActionSet = [FileAction::Edit, FileAction::Create, FileAction::Edit]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "create, edit");
        assert_eq!(ActionSet::new().to_string(), "none detected");
    }

    #[test]
    fn config_defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.exchange_limit, 10);
        assert_eq!(config.min_block_chars, 10);
        assert_eq!(config.write_policy, WritePolicyMode::Strict);
    }

    #[test]
    fn config_partial_deserialize() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"write_policy":"broad","prompt_history":5}"#).unwrap();
        assert_eq!(config.write_policy, WritePolicyMode::Broad);
        assert_eq!(config.prompt_history, 5);
        assert_eq!(config.file_context_capacity, 32);
    }

    #[test]
    fn config_builder() {
        let config = SessionConfig::new()
            .with_exchange_limit(4)
            .with_file_context_capacity(2)
            .with_write_policy(WritePolicyMode::Broad);
        assert_eq!(config.exchange_limit, 4);
        assert_eq!(config.file_context_capacity, 2);
        assert_eq!(config.write_policy, WritePolicyMode::Broad);
    }
}

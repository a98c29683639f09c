//! Write eligibility for implicit blocks
//!
//! Directive blocks are always written. An implicit block is written when any
//! rule grants it:
//!
//! | rule | grant |
//! |------|-------|
//! | a | filename was mentioned in the request |
//! | b | some action was detected (strict: and the filename was detected) |
//! | c | `create` detected and the name contains a well-known fragment |
//! | d | `edit` detected and the name contains a well-known fragment |
//! | e | `create` detected and the file does not exist yet |
//!
//! Rule e needs I/O, so [`evaluate`] answers [`Decision::Probe`] when it is
//! the only rule left that could grant, and the caller finishes with
//! [`after_probe`].

use crate::blocks::ContentBlock;
use crate::normalize::same_file;
use crate::types::{ActionSet, FileAction, WritePolicyMode};
use serde::Serialize;
use std::fmt;

/// Name fragments that mark a conventional project file
const WELL_KNOWN_FRAGMENTS: &[&str] = &["readme", "package", "config", "server", "index"];

/// Per-turn inputs to the policy
#[derive(Debug, Clone, Default)]
pub struct WriteContext {
    /// Files named in the originating request
    pub mentioned: Vec<String>,
    /// Actions detected this turn
    pub actions: ActionSet,
    /// Rule b breadth
    pub mode: WritePolicyMode,
}

impl WriteContext {
    /// Create context
    #[must_use]
    pub fn new(mentioned: Vec<String>, actions: ActionSet, mode: WritePolicyMode) -> Self {
        Self {
            mentioned,
            actions,
            mode,
        }
    }

    fn mentions(&self, name: &str) -> bool {
        self.mentioned.iter().any(|m| same_file(m, name))
    }
}

/// Which rule authorized a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// FILE_CREATE / FILE_UPDATE directive
    Directive,
    /// Rule a
    Mentioned,
    /// Rule b
    DetectedAction,
    /// Rule c
    WellKnownCreate,
    /// Rule d
    WellKnownEdit,
    /// Rule e
    NewFile,
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Directive => "explicit directive",
            Self::Mentioned => "mentioned in request",
            Self::DetectedAction => "detected action",
            Self::WellKnownCreate => "create of a well-known file",
            Self::WellKnownEdit => "edit of a well-known file",
            Self::NewFile => "create of a new file",
        })
    }
}

/// Policy answer for one block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Write it
    Allow(Grant),
    /// Only rule e remains; ask whether the file exists
    Probe,
    /// Leave it
    Deny,
}

/// Whether `name` contains a well-known fragment
#[must_use]
pub fn is_well_known_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    WELL_KNOWN_FRAGMENTS.iter().any(|f| lower.contains(f))
}

/// Evaluate every rule that needs no I/O
#[must_use]
pub fn evaluate(block: &ContentBlock, ctx: &WriteContext) -> Decision {
    if block.source.is_explicit() {
        return Decision::Allow(Grant::Directive);
    }
    let name = block.filename.as_str();
    if ctx.mentions(name) {
        return Decision::Allow(Grant::Mentioned);
    }
    if !ctx.actions.is_empty() {
        match ctx.mode {
            WritePolicyMode::Broad => return Decision::Allow(Grant::DetectedAction),
            // Strict already failed the mention check above, which covers the
            // detected-filename requirement.
            WritePolicyMode::Strict => {}
        }
    }
    let creating = ctx.actions.contains(FileAction::Create);
    if is_well_known_name(name) {
        if creating {
            return Decision::Allow(Grant::WellKnownCreate);
        }
        if ctx.actions.contains(FileAction::Edit) {
            return Decision::Allow(Grant::WellKnownEdit);
        }
    }
    if creating {
        Decision::Probe
    } else {
        Decision::Deny
    }
}

/// Finish rule e once existence is known
#[inline]
#[must_use]
pub fn after_probe(exists: bool) -> Decision {
    if exists {
        Decision::Deny
    } else {
        Decision::Allow(Grant::NewFile)
    }
}

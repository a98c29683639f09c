//! What a turn did

use crate::checklist::ChecklistItem;
use crate::policy::Grant;
use cohora_fs::DirEntry;
use std::fmt;

/// Why a block was not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Trimmed body under the floor
    ContentTooShort {
        /// Body length in characters
        length: usize,
    },
    /// No eligibility rule granted it
    NotAuthorized,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentTooShort { length } => {
                write!(f, "content too short ({length} chars)")
            }
            Self::NotAuthorized => f.write_str("not requested"),
        }
    }
}

/// One observable consequence of a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Directory listed
    Listed {
        /// Directory as requested
        dir: String,
        /// Entries, sorted by name
        entries: Vec<DirEntry>,
    },
    /// File shown
    Read {
        /// File
        filename: String,
        /// Full content
        content: String,
    },
    /// Delete armed and awaiting yes/no
    DeleteRequested {
        /// File
        filename: String,
    },
    /// Extra delete target in the same message, ignored
    DeleteNotQueued {
        /// File
        filename: String,
    },
    /// Reply was neither yes nor no
    ConfirmationNeeded {
        /// File still pending
        filename: String,
    },
    /// Delete declined
    DeleteCancelled {
        /// File
        filename: String,
    },
    /// File removed
    Deleted {
        /// File
        filename: String,
    },
    /// Target did not exist
    NotFound {
        /// File
        filename: String,
    },
    /// Existing file pulled into context
    AutoLoaded {
        /// File
        filename: String,
    },
    /// Detected file absent; the generator may create it
    Creatable {
        /// File
        filename: String,
    },
    /// Content persisted
    Written {
        /// File
        filename: String,
        /// Characters written
        length: usize,
        /// Rule that allowed it
        grant: Grant,
    },
    /// Empty file created
    Created {
        /// File
        filename: String,
    },
    /// Directory created
    DirectoryCreated {
        /// Directory
        dirname: String,
    },
    /// Block left unwritten
    Skipped {
        /// File
        filename: String,
        /// Why
        reason: SkipReason,
    },
    /// Path refused before any I/O
    Rejected {
        /// Path as given
        filename: String,
        /// Boundary error
        error: String,
    },
    /// Operation failed
    Failed {
        /// Path involved
        filename: String,
        /// What was attempted
        operation: &'static str,
        /// Error text
        error: String,
    },
    /// Generator round-trip failed; nothing else changed
    GenerationFailed {
        /// Error text
        error: String,
    },
}

impl SideEffect {
    /// Whether a file on disk changed
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Deleted { .. }
                | Self::Written { .. }
                | Self::Created { .. }
                | Self::DirectoryCreated { .. }
        )
    }

    /// Whether this reports a failure
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Rejected { .. }
                | Self::Failed { .. }
                | Self::GenerationFailed { .. }
        )
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listed { dir, entries } => {
                write!(f, "Files in {dir}:")?;
                for entry in entries {
                    let tag = if entry.is_dir { "[DIR]" } else { "[FILE]" };
                    write!(f, "\n  {tag} {}", entry.name)?;
                }
                Ok(())
            }
            Self::Read { filename, content } => write!(f, "Content of {filename}:\n{content}"),
            Self::DeleteRequested { filename } => write!(
                f,
                "Request to delete {filename} detected. Please confirm with 'yes' or 'no'."
            ),
            Self::DeleteNotQueued { filename } => {
                write!(f, "Only one delete can be pending; {filename} was not queued.")
            }
            Self::ConfirmationNeeded { filename } => write!(
                f,
                "Please respond with 'yes' or 'no' to confirm deletion of {filename}."
            ),
            Self::DeleteCancelled { filename } => {
                write!(f, "Deletion of {filename} cancelled.")
            }
            Self::Deleted { filename } => write!(f, "Deleted {filename}."),
            Self::NotFound { filename } => write!(f, "File {filename} does not exist."),
            Self::AutoLoaded { filename } => {
                write!(f, "Auto-loaded {filename} for editing context.")
            }
            Self::Creatable { filename } => write!(f, "{filename} not found; it can be created."),
            Self::Written {
                filename,
                length,
                grant,
            } => write!(f, "Wrote {filename} ({length} chars, {grant})."),
            Self::Created { filename } => write!(f, "Created file {filename}."),
            Self::DirectoryCreated { dirname } => write!(f, "Created directory {dirname}."),
            Self::Skipped { filename, reason } => write!(f, "Skipped {filename}: {reason}."),
            Self::Rejected { filename, error } => write!(f, "Refused {filename}: {error}"),
            Self::Failed {
                filename,
                operation,
                error,
            } => write!(f, "Failed to {operation} {filename}: {error}"),
            Self::GenerationFailed { error } => write!(f, "Generation failed: {error}"),
        }
    }
}

/// Result of one [`Session::handle_turn`](crate::Session::handle_turn)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Redacted generator reply, empty when none was requested
    pub display: String,
    /// Consequences in the order they happened
    pub effects: Vec<SideEffect>,
    /// Checklist after the turn
    pub checklist: Vec<ChecklistItem>,
}

impl TurnOutcome {
    /// Whether there is reply text to show
    #[must_use]
    pub fn has_display(&self) -> bool {
        !self.display.is_empty()
    }

    /// Files written this turn
    #[must_use]
    pub fn written(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                SideEffect::Written { filename, .. } => Some(filename.as_str()),
                _ => None,
            })
            .collect()
    }

    /// One line per side effect
    #[must_use]
    pub fn summary(&self) -> String {
        self.effects
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lines() {
        let outcome = TurnOutcome {
            effects: vec![
                SideEffect::Written {
                    filename: "a.txt".into(),
                    length: 12,
                    grant: Grant::Mentioned,
                },
                SideEffect::Skipped {
                    filename: "b.txt".into(),
                    reason: SkipReason::ContentTooShort { length: 3 },
                },
            ],
            ..TurnOutcome::default()
        };
        assert_eq!(
            outcome.summary(),
            "Wrote a.txt (12 chars, mentioned in request).\n\
             Skipped b.txt: content too short (3 chars)."
        );
        assert_eq!(outcome.written(), vec!["a.txt"]);
        assert!(!outcome.has_display());
    }

    #[test]
    fn listing_render() {
        let effect = SideEffect::Listed {
            dir: ".".into(),
            entries: vec![DirEntry::dir("src"), DirEntry::file("a.txt")],
        };
        assert_eq!(effect.to_string(), "Files in .:\n  [DIR] src\n  [FILE] a.txt");
    }

    #[test]
    fn classification() {
        assert!(SideEffect::Deleted { filename: "a".into() }.is_mutation());
        assert!(SideEffect::NotFound { filename: "a".into() }.is_failure());
        assert!(!SideEffect::AutoLoaded { filename: "a".into() }.is_failure());
    }
}

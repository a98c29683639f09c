//! Error types for Cohora sessions

use cohora_fs::FsError;
use cohora_llm::GenerationError;
use thiserror::Error;

/// Session-level errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// File I/O collaborator failed
    #[error(transparent)]
    Fs(#[from] FsError),

    /// Text-generation collaborator failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Generation requested with no provider selected
    #[error("no text generator selected; use /switch <name>")]
    NoProvider,

    /// Filename missing or unusable
    #[error("invalid filename '{name}': {reason}")]
    InvalidFilename {
        /// Name as given
        name: String,
        /// Why it was refused
        reason: &'static str,
    },

    /// Write refused because the content was empty
    #[error("no content given for {name}")]
    EmptyContent {
        /// Target filename
        name: String,
    },
}

impl SessionError {
    /// Create invalid filename error
    #[inline]
    #[must_use]
    pub fn invalid_filename(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidFilename {
            name: name.into(),
            reason,
        }
    }

    /// Check if the target file was missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fs(e) if e.is_not_found())
    }

    /// Check if a path escaped the working directory
    #[inline]
    #[must_use]
    pub fn is_boundary_violation(&self) -> bool {
        matches!(self, Self::Fs(e) if e.is_boundary_violation())
    }

    /// Check if the generator failed
    #[inline]
    #[must_use]
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_) | Self::NoProvider)
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

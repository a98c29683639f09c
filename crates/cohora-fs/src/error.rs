//! Error types for file operations
//!
//! Keeps "the target does not exist" apart from every other I/O failure so
//! callers can report the two differently.

use std::io;

/// Errors produced by a [`FileSystem`](crate::FileSystem) implementation
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// Path resolves outside the working directory
    #[error("path escapes the working directory: {path}")]
    OutsideRoot { path: String },

    /// Path is syntactically unusable
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Target file or directory is absent
    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    /// Directory operation on a file
    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// File operation on a directory
    #[error("is a directory: {path}")]
    IsADirectory { path: String },

    /// Any other I/O failure (permissions, disk, ...)
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Classify a raw I/O error for `path`
    pub fn from_io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create not-found error
    #[inline]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create boundary violation error
    #[inline]
    pub fn outside_root(path: impl Into<String>) -> Self {
        Self::OutsideRoot { path: path.into() }
    }

    /// Check if the target was simply absent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the path was rejected by the working-directory boundary
    #[inline]
    #[must_use]
    pub fn is_boundary_violation(&self) -> bool {
        matches!(self, Self::OutsideRoot { .. } | Self::InvalidPath { .. })
    }
}

/// Result type alias for file operations
pub type FsResult<T> = Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_separates_not_found() {
        let err = FsError::from_io("a.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = FsError::from_io("a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
        assert!(matches!(err, FsError::Io { .. }));
    }

    #[test]
    fn boundary_errors_display() {
        let err = FsError::outside_root("../etc/passwd");
        assert!(err.is_boundary_violation());
        assert_eq!(
            err.to_string(),
            "path escapes the working directory: ../etc/passwd"
        );
    }
}

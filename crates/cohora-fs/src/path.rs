//! Working-directory relative paths
//!
//! Provides [`RelativePath`], the only path shape a session may hand to the
//! file system. Parsing rejects absolute paths and `..` segments, so a value
//! of this type can never address anything outside the working directory.

use crate::error::{FsError, FsResult};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Path below the working directory
///
/// Stored as normalized segments: `./docs//a.md` and `docs/a.md` are equal.
/// The empty path is the working directory itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RelativePath(Vec<String>);

impl RelativePath {
    /// Parse and validate a user- or generator-supplied path
    ///
    /// # Errors
    /// - [`FsError::InvalidPath`] for empty input or embedded NUL bytes
    /// - [`FsError::OutsideRoot`] for absolute paths, drive prefixes and `..`
    pub fn parse(raw: &str) -> FsResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FsError::InvalidPath {
                path: raw.to_string(),
                reason: "empty path",
            });
        }
        if trimmed.contains('\0') {
            return Err(FsError::InvalidPath {
                path: raw.to_string(),
                reason: "contains NUL byte",
            });
        }
        if trimmed.starts_with('/') || trimmed.starts_with('\\') || has_drive_prefix(trimmed) {
            return Err(FsError::outside_root(trimmed));
        }

        let mut segments = Vec::new();
        for seg in trimmed.split(['/', '\\']) {
            match seg {
                "" | "." => continue,
                ".." => return Err(FsError::outside_root(trimmed)),
                other => segments.push(other.to_string()),
            }
        }
        Ok(Self(segments))
    }

    /// The working directory itself
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Check if this is the working directory itself
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Last segment (if not root)
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut new = self.clone();
        new.0.push(segment.into());
        new
    }

    /// Join onto a root directory
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut out = root.to_path_buf();
        for seg in &self.0 {
            out.push(seg);
        }
        out
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.0.join("/"))
        }
    }
}

impl FromStr for RelativePath {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn has_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

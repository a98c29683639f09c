//! Cohora FS - the file I/O collaborator
//!
//! Every path a session touches goes through [`RelativePath`], which refuses
//! to leave the working directory. Two implementations of [`FileSystem`] are
//! provided:
//!
//! - [`WorkspaceFs`]: real files under a root directory via `tokio::fs`
//! - [`MemoryFs`]: an in-memory tree for tests and dry runs
//!
//! # Example
//!
//! ```rust,ignore
//! use cohora_fs::{FileSystem, WorkspaceFs};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fs = WorkspaceFs::open(".").await?;
//! fs.write("notes.txt", "hello").await?;
//! assert_eq!(fs.read("notes.txt").await?, "hello");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod path;
pub mod workspace;

pub use error::{FsError, FsResult};
pub use memory::MemoryFs;
pub use path::RelativePath;
pub use workspace::WorkspaceFs;

use async_trait::async_trait;
use std::path::Path;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirEntry {
    /// Entry name (no directory part)
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl DirEntry {
    /// Create file entry
    #[inline]
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    /// Create directory entry
    #[inline]
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// File operations a session may perform
///
/// All `path` arguments are relative to the session's working directory and
/// are validated with [`RelativePath::parse`]; anything escaping the root is
/// rejected with [`FsError::OutsideRoot`] before touching the disk.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Working directory all paths are resolved against
    fn root(&self) -> &Path;

    /// List a directory, sorted by name
    async fn list(&self, dir: &str) -> FsResult<Vec<DirEntry>>;

    /// Read a UTF-8 file
    async fn read(&self, path: &str) -> FsResult<String>;

    /// Create or overwrite a file, creating missing parent directories
    async fn write(&self, path: &str, content: &str) -> FsResult<()>;

    /// Delete a file
    async fn remove(&self, path: &str) -> FsResult<()>;

    /// Check whether a file or directory exists
    ///
    /// Invalid or escaping paths report `false`.
    async fn exists(&self, path: &str) -> bool;

    /// Create a directory and any missing parents
    async fn mkdir(&self, path: &str) -> FsResult<()>;
}

//! Disk-backed file system rooted at a working directory

use crate::error::{FsError, FsResult};
use crate::path::RelativePath;
use crate::{DirEntry, FileSystem};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Real files below a canonical root directory
///
/// Besides the lexical checks done by [`RelativePath`], every operation
/// canonicalizes the nearest existing ancestor of its target and refuses to
/// proceed when a symlink leads outside the root.
#[derive(Debug, Clone)]
pub struct WorkspaceFs {
    root: PathBuf,
}

impl WorkspaceFs {
    /// Open a working directory
    ///
    /// # Errors
    /// Returns [`FsError::NotFound`] if `root` does not exist and
    /// [`FsError::NotADirectory`] if it is a file.
    pub async fn open(root: impl AsRef<Path>) -> FsResult<Self> {
        let display = root.as_ref().display().to_string();
        let root = fs::canonicalize(root.as_ref())
            .await
            .map_err(|e| FsError::from_io(display.clone(), e))?;
        let meta = fs::metadata(&root)
            .await
            .map_err(|e| FsError::from_io(display.clone(), e))?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory { path: display });
        }
        tracing::debug!(root = %root.display(), "opened workspace");
        Ok(Self { root })
    }

    /// Validate `raw` and map it onto the disk
    async fn resolve(&self, raw: &str) -> FsResult<(RelativePath, PathBuf)> {
        let rel = RelativePath::parse(raw)?;
        let full = rel.resolve(&self.root);
        self.ensure_contained(&rel, &full).await?;
        Ok((rel, full))
    }

    /// Reject targets whose existing ancestor resolves outside the root
    async fn ensure_contained(&self, rel: &RelativePath, full: &Path) -> FsResult<()> {
        let mut probe = Some(full.to_path_buf());
        while let Some(candidate) = probe {
            if fs::try_exists(&candidate).await.unwrap_or(false) {
                let canonical = fs::canonicalize(&candidate)
                    .await
                    .map_err(|e| FsError::from_io(rel.to_string(), e))?;
                if !canonical.starts_with(&self.root) {
                    tracing::warn!(path = %rel, "symlink escapes working directory");
                    return Err(FsError::outside_root(rel.to_string()));
                }
                return Ok(());
            }
            if candidate == self.root {
                break;
            }
            probe = candidate.parent().map(Path::to_path_buf);
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for WorkspaceFs {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list(&self, dir: &str) -> FsResult<Vec<DirEntry>> {
        let (rel, full) = self.resolve(dir).await?;
        let meta = fs::metadata(&full)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))?;
        if !meta.is_dir() {
            return Err(FsError::NotADirectory {
                path: rel.to_string(),
            });
        }

        let mut reader = fs::read_dir(&full)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read(&self, path: &str) -> FsResult<String> {
        let (rel, full) = self.resolve(path).await?;
        if fs::metadata(&full).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Err(FsError::IsADirectory {
                path: rel.to_string(),
            });
        }
        fs::read_to_string(&full)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))
    }

    async fn write(&self, path: &str, content: &str) -> FsResult<()> {
        let (rel, full) = self.resolve(path).await?;
        if rel.is_root() {
            return Err(FsError::IsADirectory {
                path: rel.to_string(),
            });
        }
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FsError::from_io(rel.to_string(), e))?;
        }
        fs::write(&full, content)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))?;
        tracing::debug!(path = %rel, bytes = content.len(), "wrote file");
        Ok(())
    }

    async fn remove(&self, path: &str) -> FsResult<()> {
        let (rel, full) = self.resolve(path).await?;
        let meta = fs::metadata(&full)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))?;
        if meta.is_dir() {
            return Err(FsError::IsADirectory {
                path: rel.to_string(),
            });
        }
        fs::remove_file(&full)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))?;
        tracing::debug!(path = %rel, "removed file");
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path).await {
            Ok((_, full)) => fs::try_exists(&full).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn mkdir(&self, path: &str) -> FsResult<()> {
        let (rel, full) = self.resolve(path).await?;
        fs::create_dir_all(&full)
            .await
            .map_err(|e| FsError::from_io(rel.to_string(), e))
    }
}

//! In-memory file system
//!
//! Mirrors [`WorkspaceFs`](crate::WorkspaceFs) semantics closely enough for
//! session tests: the same path validation, not-found vs. other errors,
//! parent creation on write. Individual paths can be marked read-only to
//! exercise write-failure handling.

use crate::error::{FsError, FsResult};
use crate::path::RelativePath;
use crate::{DirEntry, FileSystem};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Node {
    File(String),
    Dir,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: BTreeMap<RelativePath, Node>,
    read_only: BTreeSet<RelativePath>,
    writes: usize,
}

impl Tree {
    fn is_dir(&self, path: &RelativePath) -> bool {
        path.is_root() || matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn create_dirs(&mut self, path: &RelativePath) -> FsResult<()> {
        let mut current = RelativePath::root();
        for seg in path.segments() {
            current = current.child(seg.clone());
            match self.nodes.get(&current) {
                Some(Node::File(_)) => {
                    return Err(FsError::NotADirectory {
                        path: current.to_string(),
                    })
                }
                Some(Node::Dir) => {}
                None => {
                    self.nodes.insert(current.clone(), Node::Dir);
                }
            }
        }
        Ok(())
    }
}

/// File system held entirely in memory
#[derive(Debug)]
pub struct MemoryFs {
    root: PathBuf,
    tree: Mutex<Tree>,
}

impl MemoryFs {
    /// Create empty file system
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/workspace"),
            tree: Mutex::new(Tree::default()),
        }
    }

    /// Create with files already present
    ///
    /// # Panics
    /// Panics if a seed path is invalid; intended for test fixtures.
    #[must_use]
    pub fn with_files<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let fs = Self::new();
        {
            let mut tree = fs.tree.lock();
            for (path, content) in files {
                let rel = RelativePath::parse(path).expect("valid seed path");
                if let Some(parent) = rel.parent() {
                    tree.create_dirs(&parent).expect("seed parents are directories");
                }
                tree.nodes.insert(rel, Node::File(content.to_string()));
            }
        }
        fs
    }

    /// Make writes to `path` fail with a permission error
    pub fn deny_writes(&self, path: &str) {
        if let Ok(rel) = RelativePath::parse(path) {
            self.tree.lock().read_only.insert(rel);
        }
    }

    /// Current content of a file, bypassing the async interface
    #[must_use]
    pub fn content(&self, path: &str) -> Option<String> {
        let rel = RelativePath::parse(path).ok()?;
        match self.tree.lock().nodes.get(&rel) {
            Some(Node::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Number of successful writes so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.tree.lock().writes
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystem for MemoryFs {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn list(&self, dir: &str) -> FsResult<Vec<DirEntry>> {
        let rel = RelativePath::parse(dir)?;
        let tree = self.tree.lock();
        if !tree.is_dir(&rel) {
            return match tree.nodes.get(&rel) {
                Some(Node::File(_)) => Err(FsError::NotADirectory {
                    path: rel.to_string(),
                }),
                _ => Err(FsError::not_found(rel.to_string())),
            };
        }

        let depth = rel.segments().len() + 1;
        let entries = tree
            .nodes
            .iter()
            .filter(|(path, _)| path.segments().len() == depth && path.parent().as_ref() == Some(&rel))
            .filter_map(|(path, node)| {
                let name = path.file_name()?.to_string();
                Some(DirEntry {
                    name,
                    is_dir: matches!(node, Node::Dir),
                })
            })
            .collect();
        Ok(entries)
    }

    async fn read(&self, path: &str) -> FsResult<String> {
        let rel = RelativePath::parse(path)?;
        let tree = self.tree.lock();
        match tree.nodes.get(&rel) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir) => Err(FsError::IsADirectory {
                path: rel.to_string(),
            }),
            None if rel.is_root() => Err(FsError::IsADirectory {
                path: rel.to_string(),
            }),
            None => Err(FsError::not_found(rel.to_string())),
        }
    }

    async fn write(&self, path: &str, content: &str) -> FsResult<()> {
        let rel = RelativePath::parse(path)?;
        let mut tree = self.tree.lock();
        if tree.is_dir(&rel) {
            return Err(FsError::IsADirectory {
                path: rel.to_string(),
            });
        }
        if tree.read_only.contains(&rel) {
            return Err(FsError::from_io(
                rel.to_string(),
                io::Error::from(io::ErrorKind::PermissionDenied),
            ));
        }
        if let Some(parent) = rel.parent() {
            tree.create_dirs(&parent)?;
        }
        tree.nodes.insert(rel, Node::File(content.to_string()));
        tree.writes += 1;
        Ok(())
    }

    async fn remove(&self, path: &str) -> FsResult<()> {
        let rel = RelativePath::parse(path)?;
        let mut tree = self.tree.lock();
        match tree.nodes.get(&rel) {
            Some(Node::File(_)) => {
                tree.nodes.remove(&rel);
                Ok(())
            }
            Some(Node::Dir) => Err(FsError::IsADirectory {
                path: rel.to_string(),
            }),
            None => Err(FsError::not_found(rel.to_string())),
        }
    }

    async fn exists(&self, path: &str) -> bool {
        match RelativePath::parse(path) {
            Ok(rel) => {
                let tree = self.tree.lock();
                rel.is_root() || tree.nodes.contains_key(&rel)
            }
            Err(_) => false,
        }
    }

    async fn mkdir(&self, path: &str) -> FsResult<()> {
        let rel = RelativePath::parse(path)?;
        self.tree.lock().create_dirs(&rel)
    }
}

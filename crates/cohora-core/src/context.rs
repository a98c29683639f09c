//! Bounded session memory
//!
//! Two independent bounds: file contents live in an LRU keyed by filename,
//! and exchanges live in a ring that drops the oldest entry first.

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// A file held for prompt context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Filename relative to the working directory
    pub filename: String,
    /// Full content as last seen
    pub content: String,
    /// When it was read or written
    pub loaded_at: DateTime<Utc>,
}

impl ContextEntry {
    /// Create entry stamped now
    #[must_use]
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            loaded_at: Utc::now(),
        }
    }
}

/// One completed generator round-trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// What the user typed
    pub user_text: String,
    /// What came back
    pub generated_text: String,
}

/// File map plus exchange log
#[derive(Debug)]
pub struct ContextStore {
    files: LruCache<String, ContextEntry>,
    exchanges: VecDeque<Exchange>,
    exchange_limit: usize,
}

impl ContextStore {
    /// Create store; a zero file capacity is raised to one
    #[must_use]
    pub fn new(file_capacity: usize, exchange_limit: usize) -> Self {
        let capacity = NonZeroUsize::new(file_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            files: LruCache::new(capacity),
            exchanges: VecDeque::with_capacity(exchange_limit),
            exchange_limit,
        }
    }

    /// Insert or replace a file entry, marking it most recent
    pub fn upsert(&mut self, filename: impl Into<String>, content: impl Into<String>) {
        self.insert(ContextEntry::new(filename, content));
    }

    /// Insert a prepared entry, marking it most recent
    pub fn insert(&mut self, entry: ContextEntry) {
        let key = entry.filename.clone();
        if let Some((evicted, _)) = self.files.push(key.clone(), entry) {
            if evicted != key {
                tracing::debug!(filename = %evicted, "context entry evicted");
            }
        }
    }

    /// Forget a file
    pub fn remove(&mut self, filename: &str) -> Option<ContextEntry> {
        self.files.pop(filename)
    }

    /// Look up a file without changing recency
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&ContextEntry> {
        self.files.peek(filename)
    }

    /// Number of files held
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// File entries, least recently touched first
    pub fn files(&self) -> impl Iterator<Item = &ContextEntry> {
        self.files.iter().rev().map(|(_, entry)| entry)
    }

    /// Record a round-trip, evicting the oldest beyond the limit
    pub fn append_exchange(&mut self, user_text: impl Into<String>, generated_text: impl Into<String>) {
        self.exchanges.push_back(Exchange {
            user_text: user_text.into(),
            generated_text: generated_text.into(),
        });
        while self.exchanges.len() > self.exchange_limit {
            self.exchanges.pop_front();
        }
    }

    /// Up to `n` most recent exchanges, oldest first
    #[must_use]
    pub fn recent_exchanges(&self, n: usize) -> Vec<&Exchange> {
        let skip = self.exchanges.len().saturating_sub(n);
        self.exchanges.iter().skip(skip).collect()
    }

    /// Number of exchanges held
    #[inline]
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.exchanges.len()
    }

    /// Drop the exchange log; files stay
    pub fn clear_history(&mut self) {
        self.exchanges.clear();
    }
}

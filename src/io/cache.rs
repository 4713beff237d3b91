use std::collections::VecDeque;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::models::Table;

/// Parsed tables keyed by a SHA-256 of the upload (file name + content).
///
/// Holds at most `capacity` entries; the least recently used is dropped first.
/// Parsing happens outside the cache, so only successful loads are inserted.
#[derive(Debug)]
pub struct TableCache {
    capacity: usize,
    entries: VecDeque<(String, Arc<Table>)>,
}

impl TableCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    /// Cache key for an upload.
    pub fn content_key(data: &[u8], name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Look up a table and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<Arc<Table>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos)?;
        let table = Arc::clone(&entry.1);
        self.entries.push_back(entry);
        tracing::debug!(key = %key, "table cache hit");
        Some(table)
    }

    /// Store a parsed table, evicting the least recently used entries.
    ///
    /// When the key is already present the stored table wins and is returned,
    /// so concurrent loads of one upload share a single table.
    pub fn insert(&mut self, key: String, table: Arc<Table>) -> Arc<Table> {
        if let Some(existing) = self.get(&key) {
            return existing;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        tracing::debug!(key = %key, "table cached");
        self.entries.push_back((key, Arc::clone(&table)));
        table
    }

    pub fn contains(&self, data: &[u8], name: &str) -> bool {
        let key = Self::content_key(data, name);
        self.entries.iter().any(|(k, _)| *k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new(1)
    }
}

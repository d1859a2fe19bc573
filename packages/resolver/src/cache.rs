//! Cross-call cache of fetched grid-defining nodes.
//!
//! Keyed by `(file key, node id)`. Entries are shared as `Arc<RawNode>` and
//! never mutated after insertion. The lock is only held inside the methods
//! below, never across an await point.

use designlens_model::RawNode;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How the cache bounds its size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Keep every entry for the life of the process
    #[default]
    Unbounded,
    /// Drop the least recently used entry once `capacity` is reached
    Lru { capacity: NonZeroUsize },
}

impl EvictionPolicy {
    /// `None` or zero means unbounded
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        match capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => EvictionPolicy::Lru { capacity },
            None => EvictionPolicy::Unbounded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

struct Inner {
    entries: LruCache<(String, String), Arc<RawNode>>,
    hits: usize,
    misses: usize,
}

pub struct NodeCache {
    policy: EvictionPolicy,
    inner: Mutex<Inner>,
}

impl NodeCache {
    pub fn new(policy: EvictionPolicy) -> Self {
        let entries = match policy {
            EvictionPolicy::Unbounded => LruCache::unbounded(),
            EvictionPolicy::Lru { capacity } => LruCache::new(capacity),
        };
        Self {
            policy,
            inner: Mutex::new(Inner {
                entries,
                hits: 0,
                misses: 0,
            }),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(EvictionPolicy::Unbounded)
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, file_key: &str, node_id: &str) -> Option<Arc<RawNode>> {
        let mut inner = self.lock();
        let key = (file_key.to_string(), node_id.to_string());
        match inner.entries.get(&key).cloned() {
            Some(node) => {
                inner.hits += 1;
                Some(node)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a node. An existing entry for the same key is kept.
    pub fn insert(&self, file_key: &str, node_id: &str, node: RawNode) -> Arc<RawNode> {
        let mut inner = self.lock();
        let key = (file_key.to_string(), node_id.to_string());
        if let Some(existing) = inner.entries.get(&key) {
            return Arc::clone(existing);
        }
        let node = Arc::new(node);
        inner.entries.put(key, Arc::clone(&node));
        node
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}

impl Default for NodeCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl std::fmt::Debug for NodeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCache")
            .field("policy", &self.policy)
            .field("stats", &self.stats())
            .finish()
    }
}

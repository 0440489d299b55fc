//! Recency tracking for size-bounded caches.
//!
//! The tracker variant is fixed at construction time: an unbounded cache
//! pays nothing for recency bookkeeping, a bounded one keeps an LRU list.
//! Eviction is reported by return value rather than by callback, so the
//! caller decides where (and under which locks) to act on the victim.

use std::hash::Hash;

use ahash::AHashMap;

/// Sentinel indices in the `nodes` arena.
const HEAD: usize = 0; // most-recently-used end
const TAIL: usize = 1; // least-recently-used end
const NULL: usize = usize::MAX;

// ---------------------------------------------------------------------------
// EvictionTracker
// ---------------------------------------------------------------------------

pub(crate) enum EvictionTracker<K> {
    /// No size limit; every operation is a no-op.
    Unbounded,
    /// At most `limit` keys, evicting the least recently added/touched.
    Bounded(KeyLru<K>),
}

impl<K: Hash + Eq + Clone> EvictionTracker<K> {
    pub(crate) fn unbounded() -> Self {
        EvictionTracker::Unbounded
    }

    pub(crate) fn bounded(limit: usize) -> Self {
        EvictionTracker::Bounded(KeyLru::new(limit))
    }

    /// Records `key` as most recently used. Returns the key evicted to make
    /// room, if the tracker is bounded and its limit was exceeded.
    pub(crate) fn add(&mut self, key: K) -> Option<K> {
        match self {
            EvictionTracker::Unbounded => None,
            EvictionTracker::Bounded(lru) => lru.add(key),
        }
    }

    /// Forgets `key`. Explicit removal never reports a victim.
    pub(crate) fn remove(&mut self, key: &K) {
        if let EvictionTracker::Bounded(lru) = self {
            lru.remove(key);
        }
    }
}

// ---------------------------------------------------------------------------
// KeyLru
// ---------------------------------------------------------------------------

struct LruNode<K> {
    /// `None` only for the HEAD and TAIL sentinels.
    key: Option<K>,
    /// Index toward HEAD (more recently used).
    prev: usize,
    /// Index toward TAIL (less recently used).
    next: usize,
}

/// O(1) bounded LRU key list backed by an index-arena doubly-linked list.
///
/// Nodes live in a `Vec<LruNode<K>>` and link by index, avoiding unsafe
/// raw pointers at the cost of a little indirection.
pub(crate) struct KeyLru<K> {
    /// Index 0 = HEAD sentinel, 1 = TAIL sentinel, 2+ = real entries.
    nodes: Vec<LruNode<K>>,
    /// Maps a key to its index in `nodes`.
    map: AHashMap<K, usize>,
    /// Indices of freed (reusable) slots.
    free_list: Vec<usize>,
    limit: usize,
}

impl<K: Hash + Eq + Clone> KeyLru<K> {
    fn new(limit: usize) -> Self {
        let mut nodes: Vec<LruNode<K>> = Vec::with_capacity(16);
        // HEAD sentinel (index 0): next points to TAIL initially
        nodes.push(LruNode {
            key: None,
            prev: NULL,
            next: TAIL,
        });
        // TAIL sentinel (index 1): prev points to HEAD initially
        nodes.push(LruNode {
            key: None,
            prev: HEAD,
            next: NULL,
        });

        KeyLru {
            nodes,
            map: AHashMap::new(),
            free_list: Vec::new(),
            limit,
        }
    }

    /// Touches or inserts `key` at the MRU position. If the insert pushed
    /// the list past its limit, unlinks and returns the LRU key.
    fn add(&mut self, key: K) -> Option<K> {
        if let Some(&idx) = self.map.get(&key) {
            self.unlink(idx);
            self.link_after_head(idx);
            return None;
        }

        let idx = self.alloc_node(key.clone());
        self.map.insert(key, idx);
        self.link_after_head(idx);

        if self.map.len() > self.limit {
            self.evict_lru()
        } else {
            None
        }
    }

    /// Deletes `key` from the list without reporting it as a victim.
    fn remove(&mut self, key: &K) {
        if let Some(idx) = self.map.remove(key) {
            self.unlink(idx);
            self.nodes[idx].key = None;
            self.free_list.push(idx);
        }
    }

    /// Links `idx` immediately after the HEAD sentinel (marks it most-recently-used).
    fn link_after_head(&mut self, idx: usize) {
        let old_first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = old_first;
        self.nodes[HEAD].next = idx;
        self.nodes[old_first].prev = idx;
    }

    /// Detaches `idx` from its current position in the list.
    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = NULL;
        self.nodes[idx].next = NULL;
    }

    /// Allocates a new node (reusing from the free list when available).
    fn alloc_node(&mut self, key: K) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].key = Some(key);
            self.nodes[idx].prev = NULL;
            self.nodes[idx].next = NULL;
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(LruNode {
                key: Some(key),
                prev: NULL,
                next: NULL,
            });
            idx
        }
    }

    /// Unlinks the least-recently-used entry and returns its key.
    fn evict_lru(&mut self) -> Option<K> {
        let lru_idx = self.nodes[TAIL].prev;
        if lru_idx == HEAD {
            return None; // list is empty
        }
        self.unlink(lru_idx);
        let key = self.nodes[lru_idx].key.take()?;
        self.map.remove(&key);
        self.free_list.push(lru_idx);
        Some(key)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

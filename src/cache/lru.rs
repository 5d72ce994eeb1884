//! LRU Engine Module
//!
//! Byte-budgeted least-recently-used store. Not safe for concurrent access;
//! see [`CacheStore`](super::CacheStore) for the locked wrapper.

use std::collections::HashMap;
use std::fmt;

/// Values stored in the engine report their size in bytes.
pub trait ByteLen {
    fn byte_len(&self) -> usize;
}

impl ByteLen for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

impl ByteLen for String {
    fn byte_len(&self) -> usize {
        self.len()
    }
}

/// Callback invoked with each evicted entry. Must not call back into the engine.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

// == Node ==
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Recency-ordered store bounded by the total size of keys plus values.
///
/// Entries live in a dense slot vector linked by index:
/// - `head` = least recently used
/// - `tail` = most recently used
///
/// A `max_bytes` of 0 disables eviction entirely.
pub struct LruCache<V> {
    max_bytes: usize,
    used_bytes: usize,
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<String, usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: ByteLen> LruCache<V> {
    // == Constructor ==
    /// Creates an empty engine with the given byte budget and optional eviction callback.
    pub fn new(max_bytes: usize, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted,
        }
    }

    // == Get ==
    /// Looks up a key and promotes it to most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_tail(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts until the byte budget holds.
    pub fn add(&mut self, key: String, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            self.move_to_tail(idx);
            if let Some(node) = self.slots[idx].as_mut() {
                self.used_bytes = self.used_bytes - node.value.byte_len() + value.byte_len();
                node.value = value;
            }
        } else {
            self.used_bytes += key.len() + value.byte_len();
            let idx = self.alloc(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.push_tail(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and hands it to the eviction callback.
    ///
    /// Returns the evicted pair, or None if the engine is empty.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.head?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        self.used_bytes -= node.key.len() + node.value.byte_len();

        if let Some(callback) = self.on_evicted.as_mut() {
            callback(&node.key, &node.value);
        }
        Some((node.key, node.value))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without promoting it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.head
            .and_then(|idx| self.slots[idx].as_ref())
            .map(|node| node.key.as_str())
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Sum of key and value lengths over all resident entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    // == Arena Helpers ==
    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    fn push_tail(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => {
                if let Some(node) = self.slots[t].as_mut() {
                    node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn move_to_tail(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_tail(idx);
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .field("has_on_evicted", &self.on_evicted.is_some())
            .finish()
    }
}

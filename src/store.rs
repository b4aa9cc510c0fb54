//! Text store
//!
//! Shared, bounded list of texts behind the demo service.
//! Many connections read at once; appends take the write lock.

use parking_lot::RwLock;

/// In-memory, append-only text list
#[derive(Debug)]
pub struct TextStore {
    texts: RwLock<Vec<String>>,
    capacity: usize,
}

impl TextStore {
    /// Create an empty store holding at most `capacity` texts
    pub fn new(capacity: usize) -> Self {
        Self {
            texts: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Append a text; returns false when the store is full
    pub fn add(&self, text: String) -> bool {
        let mut texts = self.texts.write();
        if texts.len() >= self.capacity {
            return false;
        }
        texts.push(text);
        true
    }

    /// Snapshot of every text in insertion order
    pub fn all(&self) -> Vec<String> {
        self.texts.read().clone()
    }

    pub fn len(&self) -> usize {
        self.texts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

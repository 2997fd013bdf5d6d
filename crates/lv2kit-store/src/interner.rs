//! String interning for IRIs and literal text
//!
//! Description files repeat the same handful of IRIs (rdf:type, lv2:port,
//! lv2:index, ...) thousands of times, so every term entering the model is
//! interned and statements share one allocation per distinct string.

use ahash::AHashSet;
use parking_lot::RwLock;
use std::sync::Arc;

/// String interner for deduplication
pub struct StringInterner {
    set: RwLock<AHashSet<Arc<str>>>,
}

impl StringInterner {
    /// Create a new empty interner
    pub fn new() -> Self {
        StringInterner {
            set: RwLock::new(AHashSet::new()),
        }
    }

    /// Intern a string, returning a shared reference
    ///
    /// If the string already exists, returns the existing Arc.
    #[inline]
    pub fn intern(&self, s: &str) -> Arc<str> {
        // Fast path: read lock
        {
            let set = self.set.read();
            if let Some(interned) = set.get(s) {
                return Arc::clone(interned);
            }
        }

        // Slow path: write lock
        let mut set = self.set.write();
        if let Some(interned) = set.get(s) {
            return Arc::clone(interned);
        }
        let interned: Arc<str> = Arc::from(s);
        set.insert(Arc::clone(&interned));
        interned
    }

    /// Intern a string that's already an Arc
    #[inline]
    pub fn intern_arc(&self, s: Arc<str>) -> Arc<str> {
        {
            let set = self.set.read();
            if let Some(interned) = set.get(&*s) {
                return Arc::clone(interned);
            }
        }

        let mut set = self.set.write();
        if let Some(interned) = set.get(&*s) {
            return Arc::clone(interned);
        }
        set.insert(Arc::clone(&s));
        s
    }

    /// Get the number of interned strings
    pub fn len(&self) -> usize {
        self.set.read().len()
    }

    /// Check if the interner is empty
    pub fn is_empty(&self) -> bool {
        self.set.read().is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

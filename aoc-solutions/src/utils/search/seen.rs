//! Registry of keys already scheduled or expanded.

use std::collections::HashSet;
use std::hash::Hash;

/// Set of search keys the engine has already dealt with.
#[derive(Debug)]
pub struct SeenRegistry<K> {
    keys: HashSet<K>,
}

impl<K: Hash + Eq> SeenRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    /// Record `key`; returns `true` if it was not present before.
    pub fn mark_seen(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Whether `key` has been recorded.
    pub fn is_seen(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been recorded.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq> Default for SeenRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_seen_reports_first_insert_only() {
        let mut seen = SeenRegistry::new();
        assert!(seen.mark_seen((1, 2, 'o')));
        assert!(!seen.mark_seen((1, 2, 'o')));
        // Same position, different phase
        assert!(seen.mark_seen((1, 2, 'r')));

        assert!(seen.is_seen(&(1, 2, 'o')));
        assert!(!seen.is_seen(&(2, 1, 'o')));
        assert_eq!(seen.len(), 2);
    }
}

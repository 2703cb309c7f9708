//! Min-priority frontier with insertion-order tie-breaking.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::error::SearchError;

/// An extracted frontier entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry<T, P> {
    /// Priority the item was inserted with
    pub priority: P,
    /// Position in insertion order (0 for the first insert)
    pub seq: u64,
    /// The item itself
    pub item: T,
}

/// Heap slot ordered by `(priority, seq)` only; the item never takes part in comparisons.
struct Slot<T, P>(FrontierEntry<T, P>);

impl<T, P: Ord> PartialEq for Slot<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, P: Ord> Eq for Slot<T, P> {}

impl<T, P: Ord> PartialOrd for Slot<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, P: Ord> Ord for Slot<T, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .priority
            .cmp(&other.0.priority)
            .then(self.0.seq.cmp(&other.0.seq))
    }
}

/// Pending search entries, extracted lowest priority first.
///
/// `BinaryHeap` is a max-heap, so slots are wrapped in `Reverse`. Equal
/// priorities come out in insertion order, which keeps searches
/// reproducible run to run.
pub struct Frontier<T, P> {
    heap: BinaryHeap<Reverse<Slot<T, P>>>,
    next_seq: u64,
    peak: usize,
}

impl<T, P: Ord> Frontier<T, P> {
    /// Create an empty frontier.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            peak: 0,
        }
    }

    /// Insert `item` with `priority`.
    pub fn insert(&mut self, item: T, priority: P) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Slot(FrontierEntry {
            priority,
            seq,
            item,
        })));
        self.peak = self.peak.max(self.heap.len());
    }

    /// Remove the entry with the lowest priority (earliest insert on ties).
    pub fn extract_min(&mut self) -> Result<FrontierEntry<T, P>, SearchError> {
        self.heap
            .pop()
            .map(|Reverse(Slot(entry))| entry)
            .ok_or(SearchError::EmptyFrontier)
    }

    /// Priority of the entry `extract_min` would return next.
    pub fn peek_priority(&self) -> Option<&P> {
        self.heap.peek().map(|Reverse(Slot(entry))| &entry.priority)
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest number of entries pending at once.
    pub fn peak(&self) -> usize {
        self.peak
    }
}

impl<T, P: Ord> Default for Frontier<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

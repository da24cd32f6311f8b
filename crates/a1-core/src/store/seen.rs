use std::collections::{HashSet, VecDeque};

use crate::constants::SEEN_SET_CAPACITY;

/// Bounded set of already-notified message ids.
///
/// Keeps the most recently *inserted* ids; membership checks do not refresh
/// an id's position. `order` and `ids` always hold the same elements.
#[derive(Debug, Clone)]
pub struct SeenIdSet {
    order: VecDeque<i64>,
    ids: HashSet<i64>,
    capacity: usize,
}

impl SeenIdSet {
    pub fn new() -> Self {
        Self::with_capacity(SEEN_SET_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            order: VecDeque::with_capacity(capacity + 1),
            ids: HashSet::with_capacity(capacity + 1),
            capacity,
        }
    }

    // ===== Getters =====

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.iter().copied()
    }

    // ===== Mutations =====

    /// Returns true if the id was not present. Evicts the oldest id once the
    /// set grows past its capacity.
    pub fn insert(&mut self, id: i64) -> bool {
        if !self.ids.insert(id) {
            return false;
        }
        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.ids.clear();
    }
}

impl Default for SeenIdSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_reports_new_ids() {
        let mut seen = SeenIdSet::new();
        assert!(seen.is_empty());
        assert!(seen.insert(5));
        assert!(!seen.insert(5));
        assert!(seen.contains(5));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_keeps_newest_hundred() {
        let mut seen = SeenIdSet::new();
        for id in 0..150 {
            seen.insert(id);
        }
        assert_eq!(seen.len(), 100);
        assert!(!seen.contains(49));
        assert!(seen.contains(50));
        assert!(seen.contains(149));
        assert_eq!(seen.iter().collect::<Vec<_>>(), (50..150).collect::<Vec<_>>());
    }

    #[test]
    fn test_lookup_does_not_refresh_position() {
        let mut seen = SeenIdSet::with_capacity(3);
        seen.insert(1);
        seen.insert(2);
        seen.insert(3);
        // Re-inserting an existing id is a no-op, not a move to the back
        assert!(!seen.insert(1));
        seen.insert(4);
        assert!(!seen.contains(1));
        assert_eq!(seen.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn test_clear() {
        let mut seen = SeenIdSet::with_capacity(2);
        seen.insert(1);
        seen.clear();
        assert!(seen.is_empty());
        assert!(seen.insert(1));
    }
}

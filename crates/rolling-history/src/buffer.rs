//! Rolling History Implementation

use serde::{Serialize, Serializer};
use std::collections::VecDeque;

/// Window size of the live charts (20 points = 40 s at 0.5 Hz)
pub const LIVE_WINDOW: usize = 20;

/// Maximum length of a history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// At most `n` items; the oldest is evicted on overflow
    Bounded(usize),
    /// Every append is kept
    Unbounded,
}

impl Capacity {
    fn limit(self) -> Option<usize> {
        match self {
            Capacity::Bounded(n) => Some(n),
            Capacity::Unbounded => None,
        }
    }
}

/// Ordered, append-only sequence of chart points.
///
/// Items are kept in append order; the only mutations are `push` (tail
/// append with head eviction past capacity) and `clear`.
#[derive(Debug, Clone)]
pub struct RollingHistory<T> {
    items: VecDeque<T>,
    capacity: Capacity,
    /// Total items ever appended (for statistics)
    total_written: usize,
}

impl<T> RollingHistory<T> {
    /// Create a history with the given capacity
    pub fn new(capacity: Capacity) -> Self {
        let items = match capacity {
            Capacity::Bounded(n) => VecDeque::with_capacity(n),
            Capacity::Unbounded => VecDeque::new(),
        };
        Self {
            items,
            capacity,
            total_written: 0,
        }
    }

    /// Create a bounded history holding at most `n` items
    pub fn bounded(n: usize) -> Self {
        Self::new(Capacity::Bounded(n))
    }

    /// Create an unbounded history
    pub fn unbounded() -> Self {
        Self::new(Capacity::Unbounded)
    }

    /// Create a history sized for the live charts
    pub fn live() -> Self {
        Self::bounded(LIVE_WINDOW)
    }

    /// Append to the tail, evicting from the head while over capacity
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        self.total_written += 1;

        if let Some(limit) = self.capacity.limit() {
            while self.items.len() > limit {
                self.items.pop_front();
            }
        }
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another push would evict the oldest item
    pub fn is_full(&self) -> bool {
        match self.capacity.limit() {
            Some(limit) => self.items.len() >= limit,
            None => false,
        }
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Most recently appended item
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Total items appended since creation, including evicted ones
    pub fn total_written(&self) -> usize {
        self.total_written
    }
}

impl<T: Clone> RollingHistory<T> {
    /// Copy out the retained items, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T> Default for RollingHistory<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> Extend<T> for RollingHistory<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for RollingHistory<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut history = Self::unbounded();
        history.extend(iter);
        history
    }
}

// Serialized as a plain sequence; the chart layer only needs the points.
impl<T: Serialize> Serialize for RollingHistory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_read() {
        let mut history = RollingHistory::bounded(10);

        for i in 0..5 {
            history.push(i);
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.to_vec(), vec![0, 1, 2, 3, 4]);
        assert_eq!(history.latest(), Some(&4));
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut history = RollingHistory::bounded(5);

        for i in 0..10 {
            history.push(i);
        }

        // Exactly `capacity` items retained
        assert_eq!(history.len(), 5);
        assert!(history.is_full());
        assert_eq!(history.to_vec(), vec![5, 6, 7, 8, 9]);
        assert_eq!(history.total_written(), 10);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut history = RollingHistory::unbounded();

        for i in 0..1000 {
            history.push(i);
        }

        assert_eq!(history.len(), 1000);
        assert!(!history.is_full());
        assert_eq!(history.iter().next(), Some(&0));
    }

    #[test]
    fn test_clear() {
        let mut history = RollingHistory::live();
        history.extend(0..30);
        assert_eq!(history.len(), LIVE_WINDOW);

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.latest(), None);

        history.push(99);
        assert_eq!(history.to_vec(), vec![99]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = RollingHistory::bounded(0);
        history.push(1);
        assert!(history.is_empty());
    }

    #[test]
    fn test_serializes_as_sequence() {
        let history: RollingHistory<u32> = (1..=3).collect();
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, "[1,2,3]");
    }

    proptest! {
        #[test]
        fn prop_live_window_keeps_most_recent(values in prop::collection::vec(any::<i32>(), 0..200)) {
            let mut history = RollingHistory::live();
            for v in &values {
                history.push(*v);
                prop_assert!(history.len() <= LIVE_WINDOW);
            }

            let start = values.len().saturating_sub(LIVE_WINDOW);
            prop_assert_eq!(history.to_vec(), values[start..].to_vec());
        }

        #[test]
        fn prop_bounded_len_is_min(cap in 0usize..50, count in 0usize..200) {
            let mut history = RollingHistory::bounded(cap);
            history.extend(0..count);
            prop_assert_eq!(history.len(), count.min(cap));
        }
    }
}

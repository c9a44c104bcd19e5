//! Eviction Module
//!
//! Eviction policies and recency tracking for bounded caches.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Eviction policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// No eviction: once full, new entries are not cached
    None,
    /// Least Recently Used (default)
    #[default]
    Lru,
}

impl EvictionPolicy {
    /// Whether this policy tracks access order
    pub fn tracks_recency(&self) -> bool {
        matches!(self, EvictionPolicy::Lru)
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionPolicy::None => write!(f, "none"),
            EvictionPolicy::Lru => write!(f, "lru"),
        }
    }
}

impl FromStr for EvictionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(EvictionPolicy::None),
            "lru" => Ok(EvictionPolicy::Lru),
            other => Err(format!("unknown eviction policy: {}", other)),
        }
    }
}

/// Access order tracking keyed by a logical clock (oldest first)
#[derive(Debug)]
pub(crate) struct RecencyIndex<K> {
    order: BTreeMap<u64, K>,
    clock: u64,
}

impl<K> RecencyIndex<K> {
    pub(crate) fn new() -> Self {
        Self {
            order: BTreeMap::new(),
            clock: 0,
        }
    }

    /// Record a new key as most recent, returning its tick
    pub(crate) fn record(&mut self, key: K) -> u64 {
        self.clock += 1;
        self.order.insert(self.clock, key);
        self.clock
    }

    /// Move the key at `tick` to the most recent position
    pub(crate) fn refresh(&mut self, tick: u64) -> u64 {
        match self.order.remove(&tick) {
            Some(key) => self.record(key),
            None => tick,
        }
    }

    /// Remove and return the least recently used key
    pub(crate) fn pop_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_ordering() {
        let mut index = RecencyIndex::new();

        let a = index.record("a");
        index.record("b");
        index.record("c");

        // Touch 'a' again (making it most recent)
        index.refresh(a);

        // LRU should be 'b' (oldest)
        assert_eq!(index.pop_oldest(), Some("b"));
        assert_eq!(index.pop_oldest(), Some("c"));
        assert_eq!(index.pop_oldest(), Some("a"));
        assert_eq!(index.pop_oldest(), None);
    }

    #[test]
    fn test_refresh_unknown_tick() {
        let mut index: RecencyIndex<&str> = RecencyIndex::new();
        assert_eq!(index.refresh(42), 42);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("LRU".parse::<EvictionPolicy>(), Ok(EvictionPolicy::Lru));
        assert_eq!("none".parse::<EvictionPolicy>(), Ok(EvictionPolicy::None));
        assert!("lfu".parse::<EvictionPolicy>().is_err());
        assert_eq!(EvictionPolicy::default(), EvictionPolicy::Lru);
        assert_eq!(EvictionPolicy::Lru.to_string(), "lru");
    }
}

//! Bounded Cache
//!
//! Capacity-limited hashmap used for embedding and similarity memoization.

use hashbrown::{Equivalent, HashMap};
use std::hash::Hash;
use tracing::trace;

use super::eviction::{EvictionPolicy, RecencyIndex};

#[derive(Debug)]
struct Slot<V> {
    value: V,
    tick: u64,
}

/// Result of an insert into a [`BoundedCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored in free capacity
    Stored,
    /// Key was already present; value and recency refreshed
    Updated,
    /// Stored after evicting the least recently used entry
    Evicted,
    /// Cache is full (or has zero capacity) and the policy does not evict
    Rejected,
}

/// Capacity-bounded map.
///
/// With [`EvictionPolicy::Lru`] a full cache evicts its least recently used
/// entry to make room. With [`EvictionPolicy::None`] a full cache keeps its
/// existing entries and rejects the insert.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    map: HashMap<K, Slot<V>>,
    recency: RecencyIndex<K>,
    capacity: usize,
    policy: EvictionPolicy,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create an empty cache
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            map: HashMap::new(),
            recency: RecencyIndex::new(),
            capacity,
            policy,
        }
    }

    /// Look up a value, refreshing its recency.
    ///
    /// `key` may be any borrowed form that hashes like `K`, so lookups need
    /// not allocate an owned key.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        let slot = self.map.get_mut(key)?;
        if self.policy.tracks_recency() {
            slot.tick = self.recency.refresh(slot.tick);
        }
        Some(slot.value.clone())
    }

    /// Check if key exists without touching recency
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Insert a value subject to the capacity and eviction policy
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        if let Some(slot) = self.map.get_mut(&key) {
            slot.value = value;
            if self.policy.tracks_recency() {
                slot.tick = self.recency.refresh(slot.tick);
            }
            return InsertOutcome::Updated;
        }

        if self.capacity == 0 {
            return InsertOutcome::Rejected;
        }

        let mut outcome = InsertOutcome::Stored;
        if self.map.len() >= self.capacity {
            match self.policy {
                EvictionPolicy::None => {
                    trace!(capacity = self.capacity, "Cache full, insert rejected");
                    return InsertOutcome::Rejected;
                }
                EvictionPolicy::Lru => {
                    if let Some(oldest) = self.recency.pop_oldest() {
                        self.map.remove(&oldest);
                        outcome = InsertOutcome::Evicted;
                    }
                }
            }
        }

        let tick = if self.policy.tracks_recency() {
            self.recency.record(key.clone())
        } else {
            0
        };
        self.map.insert(key, Slot { value, tick });

        debug_assert!(!self.policy.tracks_recency() || self.recency.len() == self.map.len());
        outcome
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.map.clear();
        self.recency.clear();
    }

    /// Get number of cached entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut cache: BoundedCache<String, u32> = BoundedCache::new(4, EvictionPolicy::Lru);

        assert_eq!(cache.insert("a".to_string(), 1), InsertOutcome::Stored);
        assert_eq!(cache.get("a"), Some(1));
        assert!(cache.contains_key("a"));
        assert_eq!(cache.get("missing"), None);

        assert_eq!(cache.insert("a".to_string(), 2), InsertOutcome::Updated);
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache: BoundedCache<String, u32> = BoundedCache::new(3, EvictionPolicy::Lru);

        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.insert("c".to_string(), 3);

        // Touch 'a' so 'b' becomes the oldest
        cache.get("a");

        assert_eq!(cache.insert("d".to_string(), 4), InsertOutcome::Evicted);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains_key("b"));
        assert!(cache.contains_key("a"));
        assert!(cache.contains_key("c"));
        assert!(cache.contains_key("d"));
    }

    #[test]
    fn test_no_eviction_rejects_when_full() {
        let mut cache: BoundedCache<String, u32> = BoundedCache::new(2, EvictionPolicy::None);

        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        assert_eq!(cache.insert("c".to_string(), 3), InsertOutcome::Rejected);
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains_key("c"));

        // Existing keys can still be refreshed
        assert_eq!(cache.insert("a".to_string(), 10), InsertOutcome::Updated);
        assert_eq!(cache.get("a"), Some(10));
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache: BoundedCache<String, u32> = BoundedCache::new(0, EvictionPolicy::Lru);
        assert_eq!(cache.insert("a".to_string(), 1), InsertOutcome::Rejected);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache: BoundedCache<(String, String), f32> =
            BoundedCache::new(8, EvictionPolicy::Lru);
        cache.insert(("a".to_string(), "b".to_string()), 0.5);
        cache.clear();
        assert!(cache.is_empty());

        // Recency index is reset too, so the full capacity is usable again
        for i in 0..8 {
            assert_eq!(
                cache.insert((i.to_string(), "x".to_string()), 0.0),
                InsertOutcome::Stored
            );
        }
    }

    /// Borrowed stand-in for a `(String, u32)` key
    #[derive(Hash)]
    struct Tagged<'a>(&'a str, u32);

    impl Equivalent<(String, u32)> for Tagged<'_> {
        fn equivalent(&self, key: &(String, u32)) -> bool {
            self.0 == key.0 && self.1 == key.1
        }
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut cache: BoundedCache<(String, u32), &str> = BoundedCache::new(2, EvictionPolicy::Lru);
        cache.insert(("psalm".to_string(), 23), "shepherd");
        cache.insert(("psalm".to_string(), 1), "blessed");

        assert_eq!(cache.get(&Tagged("psalm", 23)), Some("shepherd"));
        assert!(cache.contains_key(&Tagged("psalm", 1)));
        assert!(!cache.contains_key(&Tagged("psalm", 2)));

        // A borrowed hit refreshes recency like an owned one
        assert_eq!(cache.insert(("john".to_string(), 3), "born again"), InsertOutcome::Evicted);
        assert!(cache.contains_key(&Tagged("psalm", 23)));
        assert!(!cache.contains_key(&Tagged("psalm", 1)));
    }
}

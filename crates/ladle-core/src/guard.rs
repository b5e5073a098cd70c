// ── Stale-response suppression ──
//
// Per-key monotonic generation counters. A caller captures a
// generation before issuing an async read (or delayed write) and
// applies the result only if that generation is still current, so of N
// overlapping operations on one key only the most recently issued one
// ever lands -- regardless of completion order.

use std::hash::Hash;

use dashmap::DashMap;

/// "Only the latest request wins", keyed by `K`.
///
/// Counters are created on first use and live for the guard's
/// lifetime; only their values change.
#[derive(Debug)]
pub struct StaleResponseGuard<K: Eq + Hash> {
    generations: DashMap<K, u64>,
}

impl<K: Eq + Hash> StaleResponseGuard<K> {
    pub fn new() -> Self {
        Self {
            generations: DashMap::new(),
        }
    }

    /// Open a new generation for `key` and return it.
    ///
    /// Unseen keys start at 0, so the first call returns 1.
    pub fn begin(&self, key: K) -> u64 {
        let mut entry = self.generations.entry(key).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Whether `generation` is still the latest issued for `key`.
    pub fn is_current(&self, key: &K, generation: u64) -> bool {
        self.generations
            .get(key)
            .is_some_and(|current| *current == generation)
    }
}

impl<K: Eq + Hash> Default for StaleResponseGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generations_increment_per_key() {
        let guard = StaleResponseGuard::new();

        assert_eq!(guard.begin(5), 1);
        assert_eq!(guard.begin(5), 2);
        assert_eq!(guard.begin(8), 1);
    }

    #[test]
    fn only_the_latest_generation_is_current() {
        let guard = StaleResponseGuard::new();

        let first = guard.begin(5);
        let second = guard.begin(5);

        assert!(!guard.is_current(&5, first));
        assert!(guard.is_current(&5, second));

        guard.begin(5);
        assert!(!guard.is_current(&5, second));
    }

    #[test]
    fn keys_are_independent() {
        let guard = StaleResponseGuard::new();

        let a = guard.begin(1);
        let b = guard.begin(2);
        guard.begin(1);

        assert!(!guard.is_current(&1, a));
        assert!(guard.is_current(&2, b));
    }

    #[test]
    fn unseen_keys_are_never_current() {
        let guard: StaleResponseGuard<i64> = StaleResponseGuard::new();
        assert!(!guard.is_current(&9, 0));
    }
}

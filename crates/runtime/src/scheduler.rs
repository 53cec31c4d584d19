//! Cancel-and-replace delayed tasks keyed per actor.

use std::collections::BTreeMap;

use rpg_core::Tick;

/// At most one pending task per key, fired once its due tick is reached.
///
/// Scheduling a key that is already pending replaces its due tick, so a burst
/// of requests collapses into a single firing after the last one.
#[derive(Debug, Clone)]
pub struct DebounceQueue<K> {
    pending: BTreeMap<K, Tick>,
}

impl<K: Ord + Copy> Default for DebounceQueue<K> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> DebounceQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` at `due`. Returns the due tick it replaced.
    pub fn schedule(&mut self, key: K, due: Tick) -> Option<Tick> {
        self.pending.insert(key, due)
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn due_at(&self, key: K) -> Option<Tick> {
        self.pending.get(&key).copied()
    }

    /// Remove and return every key whose due tick is `<= now`, in key order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<K> {
        let due: Vec<K> = self
            .pending
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(key, _)| *key)
            .collect();
        for key in &due {
            self.pending.remove(key);
        }
        due
    }

    /// Keep only keys matching `keep`. Returns the number dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(K) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|key, _| keep(*key));
        before - self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

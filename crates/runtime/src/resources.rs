//! Per-actor mana pools.
//!
//! The pool owns `current` for every joined actor; `max` mirrors the latest
//! snapshot and is pushed in by the stat aggregator. Display updates are
//! debounced: any number of changes within a tick produce one notification
//! once the display delay elapsed.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rpg_core::{ActorId, ResourceConfig, Tick};

use crate::oracle::DisplaySink;
use crate::scheduler::DebounceQueue;

/// Current and maximum mana of one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManaState {
    pub current: u32,
    pub max: u32,
}

impl ManaState {
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub const fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

pub struct ResourcePool {
    config: ResourceConfig,
    display: Arc<dyn DisplaySink>,
    pools: RwLock<HashMap<ActorId, ManaState>>,
    display_queue: Mutex<DebounceQueue<ActorId>>,
    /// Last tick seen by `flush_display`; display updates are scheduled from it.
    clock: AtomicU64,
}

impl ResourcePool {
    pub fn new(config: ResourceConfig, display: Arc<dyn DisplaySink>) -> Self {
        Self {
            config,
            display,
            pools: RwLock::new(HashMap::new()),
            display_queue: Mutex::new(DebounceQueue::new()),
            clock: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Start tracking `actor` with a full pool.
    pub fn join(&self, actor: ActorId, max: u32) {
        self.pools_mut().insert(actor, ManaState::full(max));
        self.mark_dirty(actor);
    }

    /// Stop tracking `actor`. Returns its last state.
    pub fn quit(&self, actor: ActorId) -> Option<ManaState> {
        self.queue().cancel(actor);
        self.pools_mut().remove(&actor)
    }

    pub fn get(&self, actor: ActorId) -> Option<ManaState> {
        self.pools().get(&actor).copied()
    }

    /// Current mana; 0 for untracked actors.
    pub fn current(&self, actor: ActorId) -> u32 {
        self.get(actor).map_or(0, |state| state.current)
    }

    pub fn is_tracked(&self, actor: ActorId) -> bool {
        self.pools().contains_key(&actor)
    }

    pub fn tracked(&self) -> usize {
        self.pools().len()
    }

    /// Deduct `amount` if the actor has at least that much.
    ///
    /// The check and the deduction happen under one write lock. Untracked
    /// actors can only "pay" a zero cost.
    pub fn consume(&self, actor: ActorId, amount: u32) -> bool {
        if amount == 0 {
            return true;
        }

        let paid = {
            let mut pools = self.pools_mut();
            match pools.get_mut(&actor) {
                Some(state) if state.current >= amount => {
                    state.current -= amount;
                    true
                }
                _ => false,
            }
        };

        if paid {
            self.mark_dirty(actor);
        }
        paid
    }

    /// Add mana, clamped to `[0, max]`. Returns the new current value.
    pub fn add(&self, actor: ActorId, amount: u32) -> Option<u32> {
        let updated = {
            let mut pools = self.pools_mut();
            let state = pools.get_mut(&actor)?;
            state.current = state.current.saturating_add(amount).min(state.max);
            state.current
        };
        self.mark_dirty(actor);
        Some(updated)
    }

    /// Overwrite the current value, clamped to `[0, max]`.
    pub fn set_current(&self, actor: ActorId, amount: u32) -> Option<u32> {
        let updated = {
            let mut pools = self.pools_mut();
            let state = pools.get_mut(&actor)?;
            state.current = amount.min(state.max);
            state.current
        };
        self.mark_dirty(actor);
        Some(updated)
    }

    /// Apply one regeneration cycle to every tracked actor below max.
    ///
    /// Returns the number of actors that regenerated.
    pub fn regenerate(&self) -> usize {
        let regenerated: Vec<ActorId> = {
            let mut pools = self.pools_mut();
            pools
                .iter_mut()
                .filter(|(_, state)| !state.is_full())
                .map(|(actor, state)| {
                    let amount = self.config.regen_amount(state.max);
                    state.current = state.current.saturating_add(amount).min(state.max);
                    *actor
                })
                .collect()
        };

        for actor in &regenerated {
            self.mark_dirty(*actor);
        }
        regenerated.len()
    }

    /// A new snapshot changed the actor's max: clamp current to it.
    pub fn on_snapshot_changed(&self, actor: ActorId, max: u32) {
        let changed = {
            let mut pools = self.pools_mut();
            let Some(state) = pools.get_mut(&actor) else {
                return;
            };
            let before = *state;
            state.max = max;
            state.current = state.current.min(max);
            before != *state
        };

        if changed {
            self.mark_dirty(actor);
        }
    }

    /// Push pending display updates whose delay elapsed.
    ///
    /// Returns the number of notifications sent.
    pub fn flush_display(&self, now: Tick) -> usize {
        self.clock.fetch_max(now.0, Ordering::Relaxed);

        let due = self.queue().drain_due(now);
        let updates: Vec<(ActorId, ManaState)> = {
            let pools = self.pools();
            due.into_iter()
                .filter_map(|actor| pools.get(&actor).map(|state| (actor, *state)))
                .collect()
        };

        for (actor, state) in &updates {
            self.display.resource_changed(*actor, state.current, state.max);
        }
        updates.len()
    }

    /// Drop every pool. Called at shutdown.
    pub fn clear(&self) {
        self.queue().clear();
        self.pools_mut().clear();
    }

    fn mark_dirty(&self, actor: ActorId) {
        let due = Tick(self.clock.load(Ordering::Relaxed)) + self.config.display_delay_ticks;
        self.queue().schedule(actor, due);
    }

    fn pools(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ActorId, ManaState>> {
        self.pools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn pools_mut(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ActorId, ManaState>> {
        self.pools.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, DebounceQueue<ActorId>> {
        self.display_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use crate::oracle::NullDisplay;
    use crate::testing::{DisplayEvent, RecordingDisplay};

    use super::*;

    fn pool() -> ResourcePool {
        ResourcePool::new(ResourceConfig::default(), Arc::new(NullDisplay))
    }

    #[test]
    fn consume_is_all_or_nothing() {
        let pool = pool();
        let actor = ActorId(1);
        pool.join(actor, 10);

        assert!(pool.consume(actor, 10));
        assert_eq!(pool.current(actor), 0);
        assert!(!pool.consume(actor, 1));
        assert_eq!(pool.current(actor), 0);
    }

    #[test]
    fn untracked_actor_only_pays_zero() {
        let pool = pool();
        assert!(pool.consume(ActorId(5), 0));
        assert!(!pool.consume(ActorId(5), 1));
        assert_eq!(pool.add(ActorId(5), 3), None);
    }

    #[test]
    fn add_and_set_clamp_to_max() {
        let pool = pool();
        let actor = ActorId(1);
        pool.join(actor, 50);
        pool.consume(actor, 40);

        assert_eq!(pool.add(actor, 100), Some(50));
        assert_eq!(pool.set_current(actor, 999), Some(50));
        assert_eq!(pool.set_current(actor, 7), Some(7));
    }

    #[test]
    fn regenerate_skips_full_pools() {
        let pool = ResourcePool::new(
            ResourceConfig {
                regen_percent: 0.02,
                regen_flat: 1,
                ..ResourceConfig::default()
            },
            Arc::new(NullDisplay),
        );
        pool.join(ActorId(1), 100);
        pool.join(ActorId(2), 100);
        pool.set_current(ActorId(2), 10);

        assert_eq!(pool.regenerate(), 1);
        assert_eq!(pool.current(ActorId(1)), 100);
        assert_eq!(pool.current(ActorId(2)), 13);
    }

    #[test]
    fn snapshot_change_clamps_current() {
        let pool = pool();
        let actor = ActorId(1);
        pool.join(actor, 100);

        pool.on_snapshot_changed(actor, 40);
        assert_eq!(pool.get(actor), Some(ManaState { current: 40, max: 40 }));

        pool.on_snapshot_changed(actor, 80);
        assert_eq!(pool.get(actor), Some(ManaState { current: 40, max: 80 }));
    }

    #[test]
    fn display_updates_are_debounced() {
        let display = Arc::new(RecordingDisplay::default());
        let pool = ResourcePool::new(ResourceConfig::default(), display.clone());
        let actor = ActorId(1);
        pool.join(actor, 30);
        pool.consume(actor, 5);
        pool.consume(actor, 5);

        assert_eq!(pool.flush_display(Tick(0)), 0);
        assert_eq!(pool.flush_display(Tick(1)), 1);
        assert_eq!(
            display.events(),
            vec![DisplayEvent::Resource {
                actor,
                current: 20,
                max: 30
            }]
        );
        assert_eq!(pool.flush_display(Tick(2)), 0);
    }

    #[test]
    fn quit_removes_pool_and_pending_display() {
        let display = Arc::new(RecordingDisplay::default());
        let pool = ResourcePool::new(ResourceConfig::default(), display.clone());
        pool.join(ActorId(1), 10);

        assert_eq!(pool.quit(ActorId(1)), Some(ManaState::full(10)));
        assert_eq!(pool.flush_display(Tick(5)), 0);
        assert!(display.events().is_empty());
    }
}

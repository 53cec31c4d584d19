//! Snapshot cache and recompute pipeline.
//!
//! The [`StatAggregator`] is the only component that builds
//! [`AttributeSnapshot`]s. A recompute reads the actor's base profile, folds in
//! every equipped item's bonuses, clamps, caches the result, and then tells
//! everyone downstream: the mana pool clamps to the new max, the host receives
//! max health and movement speed when they changed, and the display is told.
//!
//! Equipment changes arrive in bursts (swapping a whole armor set), so
//! [`StatAggregator::schedule_recompute`] debounces per actor. Reads never
//! wait on the debounce: a cache miss recomputes synchronously.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use rpg_core::{
    ActorId, AttributeSnapshot, BaseProfile, ModifierKey, ModifierKind, StatBonuses, StatConfig,
    StatKind, Tick,
};

use crate::api::Result;
use crate::oracle::{ActorDirectory, DisplaySink, EquipmentOracle, HostSync};
use crate::repository::ProfileRepository;
use crate::resources::ResourcePool;
use crate::scheduler::DebounceQueue;

/// Bounded snapshot cache. Eviction beyond capacity drops the oldest insert.
#[derive(Debug, Default)]
struct SnapshotCache {
    entries: HashMap<ActorId, AttributeSnapshot>,
    order: VecDeque<ActorId>,
}

impl SnapshotCache {
    fn get(&self, actor: ActorId) -> Option<AttributeSnapshot> {
        self.entries.get(&actor).copied()
    }

    fn insert(
        &mut self,
        actor: ActorId,
        snapshot: AttributeSnapshot,
        capacity: usize,
    ) -> Option<AttributeSnapshot> {
        let previous = self.entries.insert(actor, snapshot);
        if previous.is_none() {
            self.order.push_back(actor);
        }
        self.enforce(capacity);
        previous
    }

    fn remove(&mut self, actor: ActorId) -> Option<AttributeSnapshot> {
        let removed = self.entries.remove(&actor)?;
        self.order.retain(|a| *a != actor);
        Some(removed)
    }

    fn retain(&mut self, keep: impl Fn(ActorId) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|actor, _| keep(*actor));
        let entries = &self.entries;
        self.order.retain(|actor| entries.contains_key(actor));
        before - self.entries.len()
    }

    fn enforce(&mut self, capacity: usize) -> usize {
        let mut evicted = 0;
        while self.entries.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

pub struct StatAggregator {
    config: StatConfig,
    join_defaults: BaseProfile,
    repository: Arc<dyn ProfileRepository>,
    equipment: Arc<dyn EquipmentOracle>,
    directory: Arc<dyn ActorDirectory>,
    host: Arc<dyn HostSync>,
    display: Arc<dyn DisplaySink>,
    resources: Arc<ResourcePool>,
    cache: RwLock<SnapshotCache>,
    /// Base profiles of joined actors, loaded once per session.
    profiles: RwLock<HashMap<ActorId, BaseProfile>>,
    pending: Mutex<DebounceQueue<ActorId>>,
}

impl StatAggregator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: StatConfig,
        join_defaults: BaseProfile,
        repository: Arc<dyn ProfileRepository>,
        equipment: Arc<dyn EquipmentOracle>,
        directory: Arc<dyn ActorDirectory>,
        host: Arc<dyn HostSync>,
        display: Arc<dyn DisplaySink>,
        resources: Arc<ResourcePool>,
    ) -> Self {
        Self {
            config,
            join_defaults,
            repository,
            equipment,
            directory,
            host,
            display,
            resources,
            cache: RwLock::new(SnapshotCache::default()),
            profiles: RwLock::new(HashMap::new()),
            pending: Mutex::new(DebounceQueue::new()),
        }
    }

    pub fn config(&self) -> &StatConfig {
        &self.config
    }

    /// Current snapshot of `actor`.
    ///
    /// Served from the cache when present; otherwise recomputed synchronously.
    /// Actors the host does not know get the default snapshot, uncached.
    pub fn snapshot(&self, actor: ActorId) -> AttributeSnapshot {
        if let Some(snapshot) = self.cache_read().get(actor) {
            return snapshot;
        }
        if !self.directory.is_valid(actor) {
            return AttributeSnapshot::default();
        }
        self.recompute(actor)
    }

    /// Cached snapshot only, without triggering a recompute.
    pub fn cached(&self, actor: ActorId) -> Option<AttributeSnapshot> {
        self.cache_read().get(actor)
    }

    pub fn cache_len(&self) -> usize {
        self.cache_read().len()
    }

    /// Request a recompute `recompute_delay_ticks` after `now`.
    ///
    /// A request for an actor that already has one pending replaces it.
    pub fn schedule_recompute(&self, actor: ActorId, now: Tick) {
        let due = now + self.config.recompute_delay_ticks;
        self.pending().schedule(actor, due);
        tracing::trace!(target: "runtime::stats", actor = %actor, due = %due, "recompute scheduled");
    }

    pub fn pending_recompute(&self, actor: ActorId) -> Option<Tick> {
        self.pending().due_at(actor)
    }

    /// Fire every debounced recompute due at `now`. Returns how many ran.
    pub fn process_due(&self, now: Tick) -> usize {
        let due = self.pending().drain_due(now);
        let mut recomputed = 0;
        for actor in due {
            if self.directory.is_valid(actor) {
                self.recompute(actor);
                recomputed += 1;
            } else {
                tracing::debug!(target: "runtime::stats", actor = %actor, "dropping recompute for invalid actor");
            }
        }
        recomputed
    }

    /// Rebuild the snapshot of `actor` now and propagate it.
    pub fn recompute(&self, actor: ActorId) -> AttributeSnapshot {
        let base = self.base_profile(actor);
        let bonuses = self.equipment_bonuses(actor);
        let snapshot = AttributeSnapshot::compose(&base, &bonuses);

        let previous = self
            .cache_write()
            .insert(actor, snapshot, self.config.cache_capacity);

        self.propagate(actor, previous.as_ref(), &snapshot);
        snapshot
    }

    /// Load the actor's profile into the session, seeding it with the join
    /// defaults when none is stored yet.
    pub fn load_session(&self, actor: ActorId) -> Result<BaseProfile> {
        let profile = match self.repository.load(actor)? {
            Some(profile) => profile,
            None => {
                let profile = self.join_defaults.clone();
                self.repository.save(actor, &profile)?;
                profile
            }
        };
        self.profiles_write().insert(actor, profile.clone());
        Ok(profile)
    }

    /// Persist the session profile and forget it.
    pub fn end_session(&self, actor: ActorId) -> Result<()> {
        let profile = self.profiles_write().remove(&actor);
        self.evict(actor);
        if let Some(profile) = profile {
            self.repository.save(actor, &profile)?;
        }
        Ok(())
    }

    /// Set (or add to) one base stat, persist it and recompute immediately.
    ///
    /// Returns the new base value.
    pub fn set_base_stat(
        &self,
        actor: ActorId,
        stat: StatKind,
        value: i32,
        additive: bool,
    ) -> Result<i32> {
        let mut profile = self.base_profile(actor);
        let updated = profile.apply(stat, value, additive);
        self.repository.save(actor, &profile)?;

        {
            let mut profiles = self.profiles_write();
            if let Some(session) = profiles.get_mut(&actor) {
                *session = profile;
            }
        }

        tracing::info!(
            target: "runtime::stats",
            actor = %actor,
            stat = stat.name(),
            value = updated,
            "base stat updated"
        );

        self.pending().cancel(actor);
        self.recompute(actor);
        Ok(updated)
    }

    /// [`set_base_stat`](Self::set_base_stat) addressed by stat name.
    ///
    /// Unknown names are logged and ignored (`Ok(None)`).
    pub fn set_base_stat_by_name(
        &self,
        actor: ActorId,
        stat: &str,
        value: i32,
        additive: bool,
    ) -> Result<Option<i32>> {
        match stat.parse::<StatKind>() {
            Ok(kind) => self.set_base_stat(actor, kind, value, additive).map(Some),
            Err(_) => {
                tracing::warn!(target: "runtime::stats", actor = %actor, stat, "unknown stat name");
                Ok(None)
            }
        }
    }

    /// Drop all per-actor state (cached snapshot, session profile, pending
    /// recompute) of actors that are no longer active, then enforce the cache
    /// capacity bound. Returns the number of cache entries removed.
    pub fn sweep(&self) -> usize {
        let active: HashSet<ActorId> = self.directory.active_actors().into_iter().collect();
        let mut cache = self.cache_write();
        let stale = cache.retain(|actor| active.contains(&actor));
        let evicted = cache.enforce(self.config.cache_capacity);
        drop(cache);

        let sessions = {
            let mut profiles = self.profiles_write();
            let before = profiles.len();
            profiles.retain(|actor, _| active.contains(actor));
            before - profiles.len()
        };
        let cancelled = self.pending().retain(|actor| active.contains(&actor));

        if stale + evicted + sessions + cancelled > 0 {
            tracing::debug!(
                target: "runtime::stats",
                stale,
                evicted,
                sessions,
                cancelled,
                "snapshot cache swept"
            );
        }
        stale + evicted
    }

    /// Whether `actor` has a loaded session profile.
    pub fn has_session(&self, actor: ActorId) -> bool {
        self.profiles_read().contains_key(&actor)
    }

    /// Forget the cached snapshot and any pending recompute of `actor`.
    pub fn evict(&self, actor: ActorId) {
        self.pending().cancel(actor);
        self.cache_write().remove(actor);
    }

    /// Drop all cached state. Called at shutdown.
    pub fn clear(&self) {
        self.pending().clear();
        self.cache_write().clear();
        self.profiles_write().clear();
    }

    fn base_profile(&self, actor: ActorId) -> BaseProfile {
        if let Some(profile) = self.profiles_read().get(&actor) {
            return profile.clone();
        }

        match self.repository.load(actor) {
            Ok(Some(profile)) => profile,
            Ok(None) => self.join_defaults.clone(),
            Err(error) => {
                tracing::warn!(
                    target: "runtime::stats",
                    actor = %actor,
                    error = %error,
                    "failed to load base profile, using defaults"
                );
                self.join_defaults.clone()
            }
        }
    }

    fn equipment_bonuses(&self, actor: ActorId) -> StatBonuses {
        let mut total = StatBonuses::new();
        for (slot, item) in self.equipment.equipped_items(actor) {
            match self.equipment.item_bonuses(item) {
                Ok(bonuses) => total += &bonuses,
                Err(error) => tracing::warn!(
                    target: "runtime::stats",
                    actor = %actor,
                    %slot,
                    %item,
                    error = %error,
                    "unreadable equipment contributes nothing"
                ),
            }
        }
        total
    }

    /// Runs with no lock held.
    fn propagate(
        &self,
        actor: ActorId,
        previous: Option<&AttributeSnapshot>,
        snapshot: &AttributeSnapshot,
    ) {
        if previous.map(AttributeSnapshot::max_health) != Some(snapshot.max_health()) {
            self.host.set_max_health(actor, snapshot.max_health());
        }
        if previous.map(AttributeSnapshot::speed_percent) != Some(snapshot.speed_percent()) {
            self.host.set_movement_speed_modifier(
                actor,
                ModifierKey::derive(actor, ModifierKind::MovementSpeed),
                snapshot.movement_speed_modifier(),
            );
        }

        self.resources.on_snapshot_changed(actor, snapshot.max_mana());

        if previous != Some(snapshot) {
            self.display.stats_changed(actor, snapshot);
        }

        tracing::trace!(target: "runtime::stats", actor = %actor, ?snapshot, "snapshot recomputed");
    }

    fn cache_read(&self) -> std::sync::RwLockReadGuard<'_, SnapshotCache> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn cache_write(&self) -> std::sync::RwLockWriteGuard<'_, SnapshotCache> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn profiles_read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ActorId, BaseProfile>> {
        self.profiles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn profiles_write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ActorId, BaseProfile>> {
        self.profiles.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> MutexGuard<'_, DebounceQueue<ActorId>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Runtime facade and builder.
//!
//! [`RpgRuntime`] wires the services together and exposes the host-facing
//! entry points: session lifecycle (`join`/`quit`), event handlers (hits,
//! ability input, equipment changes) and the fixed-rate [`RpgRuntime::tick`].

use std::sync::Arc;

use rpg_core::{
    ActivationResult, ActorId, AttributeSnapshot, DamageCause, DirectHit, EquipmentSlot,
    InputAction, ItemHandle, PcgRng, ResolvedDamage, RngOracle, RpgConfig, StatKind, Tick,
};

use crate::abilities::{AbilityActivationCoordinator, AbilityRegistry};
use crate::ai::{ActorScheduler, AiRegistry, AiTickSummary};
use crate::api::{Result, RuntimeError};
use crate::combat::CombatService;
use crate::oracle::{
    ActorDirectory, DisplaySink, EquipmentOracle, HostSync, ItemAbilityOracle, NullDisplay,
};
use crate::repository::ProfileRepository;
use crate::resources::{ManaState, ResourcePool};
use crate::stats::StatAggregator;

/// Work performed by one [`RpgRuntime::tick`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub recomputed: usize,
    pub display_updates: usize,
    pub regenerated: usize,
    pub swept: usize,
    pub ai: AiTickSummary,
}

pub struct RpgRuntime {
    config: RpgConfig,
    directory: Arc<dyn ActorDirectory>,
    stats: Arc<StatAggregator>,
    resources: Arc<ResourcePool>,
    abilities: AbilityActivationCoordinator,
    combat: CombatService,
    ai: AiRegistry,
}

impl RpgRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RpgRuntimeBuilder {
        RpgRuntimeBuilder::new()
    }

    pub fn config(&self) -> &RpgConfig {
        &self.config
    }

    pub fn stats(&self) -> &StatAggregator {
        &self.stats
    }

    pub fn resources(&self) -> &ResourcePool {
        &self.resources
    }

    pub fn abilities(&self) -> &AbilityActivationCoordinator {
        &self.abilities
    }

    pub fn combat(&self) -> &CombatService {
        &self.combat
    }

    pub fn ai(&self) -> &AiRegistry {
        &self.ai
    }

    /// Start an actor's session.
    ///
    /// Loads (or seeds) the base profile, computes the first snapshot, pushes
    /// host attributes and fills the mana pool.
    pub fn join(&self, actor: ActorId) -> Result<AttributeSnapshot> {
        if !self.directory.is_valid(actor) {
            return Err(RuntimeError::UnknownActor(actor));
        }

        self.stats.evict(actor);
        self.stats.load_session(actor)?;
        let snapshot = self.stats.recompute(actor);
        self.resources.join(actor, snapshot.max_mana());

        tracing::info!(
            target: "runtime::stats",
            actor = %actor,
            max_health = snapshot.max_health(),
            max_mana = snapshot.max_mana(),
            "actor joined"
        );
        Ok(snapshot)
    }

    /// End an actor's session: persist the profile and drop every per-actor record.
    pub fn quit(&self, actor: ActorId, now: Tick) -> Result<()> {
        self.ai.detach(actor, now);
        self.resources.quit(actor);
        self.stats.end_session(actor)?;
        tracing::info!(target: "runtime::stats", actor = %actor, "actor quit");
        Ok(())
    }

    /// Give a non-player actor a behavior scheduler.
    pub fn attach_ai(&self, actor: ActorId, scheduler: ActorScheduler, now: Tick) {
        self.ai.attach(actor, scheduler, now);
    }

    /// Current snapshot of `actor` (default for unknown actors).
    pub fn snapshot(&self, actor: ActorId) -> AttributeSnapshot {
        self.stats.snapshot(actor)
    }

    pub fn mana(&self, actor: ActorId) -> Option<ManaState> {
        self.resources.get(actor)
    }

    /// Equipment of `actor` changed; recompute after the debounce delay.
    pub fn on_equipment_changed(&self, actor: ActorId, now: Tick) {
        self.stats.schedule_recompute(actor, now);
    }

    pub fn set_base_stat(
        &self,
        actor: ActorId,
        stat: StatKind,
        value: i32,
        additive: bool,
    ) -> Result<i32> {
        self.stats.set_base_stat(actor, stat, value, additive)
    }

    pub fn set_base_stat_by_name(
        &self,
        actor: ActorId,
        stat: &str,
        value: i32,
        additive: bool,
    ) -> Result<Option<i32>> {
        self.stats.set_base_stat_by_name(actor, stat, value, additive)
    }

    pub fn attempt_activate(
        &self,
        actor: ActorId,
        item: ItemHandle,
        action: InputAction,
        slot: EquipmentSlot,
        now: Tick,
    ) -> ActivationResult {
        self.abilities
            .attempt_activate(actor, item, action, slot, now)
    }

    pub fn resolve_direct_hit(
        &self,
        attacker: Option<ActorId>,
        victim: ActorId,
        hit: &DirectHit,
    ) -> ResolvedDamage {
        self.combat.resolve_direct_hit(attacker, victim, hit)
    }

    pub fn resolve_environmental_hit(
        &self,
        victim: ActorId,
        raw_damage: f64,
        cause: DamageCause,
    ) -> ResolvedDamage {
        self.combat
            .resolve_environmental_hit(victim, raw_damage, cause)
    }

    /// Advance the runtime by one host tick.
    ///
    /// Order: due recomputes, mana display, regeneration, cache sweep, AI.
    /// Recomputes fire first so everything later in the tick sees fresh stats.
    pub fn tick(&self, now: Tick) -> TickSummary {
        let mut summary = TickSummary {
            recomputed: self.stats.process_due(now),
            ..TickSummary::default()
        };

        if is_due(now, self.config.resources.regen_interval_ticks) {
            summary.regenerated = self.resources.regenerate();
        }

        summary.display_updates = self.resources.flush_display(now);

        if is_due(now, self.config.stats.sweep_interval_ticks) {
            summary.swept = self.stats.sweep();
        }

        if self.config.ai.enabled {
            summary.ai = self
                .ai
                .tick(now, self.directory.as_ref(), &self.stats, &self.resources);
        }

        summary
    }

    /// Stop every behavior and drop all cached and per-session state.
    pub fn shutdown(&self, now: Tick) {
        self.ai.clear(now);
        self.abilities.shutdown();
        self.resources.clear();
        self.stats.clear();
        tracing::info!(target: "runtime::stats", "runtime shut down");
    }
}

fn is_due(now: Tick, interval: u64) -> bool {
    interval > 0 && now.0 > 0 && now.0 % interval == 0
}

/// Builder for [`RpgRuntime`].
///
/// Every host collaborator is required except the display sink (defaults to
/// [`NullDisplay`]) and the random source (defaults to [`PcgRng`]).
pub struct RpgRuntimeBuilder {
    config: RpgConfig,
    repository: Option<Arc<dyn ProfileRepository>>,
    equipment: Option<Arc<dyn EquipmentOracle>>,
    item_abilities: Option<Arc<dyn ItemAbilityOracle>>,
    directory: Option<Arc<dyn ActorDirectory>>,
    host: Option<Arc<dyn HostSync>>,
    display: Option<Arc<dyn DisplaySink>>,
    rng: Option<Arc<dyn RngOracle>>,
    abilities: AbilityRegistry,
}

impl RpgRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RpgConfig::default(),
            repository: None,
            equipment: None,
            item_abilities: None,
            directory: None,
            host: None,
            display: None,
            rng: None,
            abilities: AbilityRegistry::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RpgConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(mut self, repository: Arc<dyn ProfileRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn equipment(mut self, equipment: Arc<dyn EquipmentOracle>) -> Self {
        self.equipment = Some(equipment);
        self
    }

    pub fn item_abilities(mut self, item_abilities: Arc<dyn ItemAbilityOracle>) -> Self {
        self.item_abilities = Some(item_abilities);
        self
    }

    pub fn directory(mut self, directory: Arc<dyn ActorDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn host(mut self, host: Arc<dyn HostSync>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn display(mut self, display: Arc<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    /// Random source for crit rolls
    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn abilities(mut self, abilities: AbilityRegistry) -> Self {
        self.abilities = abilities;
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<RpgRuntime> {
        let repository = self
            .repository
            .ok_or(RuntimeError::MissingCollaborator("a profile repository"))?;
        let equipment = self
            .equipment
            .ok_or(RuntimeError::MissingCollaborator("an equipment oracle"))?;
        let item_abilities = self
            .item_abilities
            .ok_or(RuntimeError::MissingCollaborator("an item ability oracle"))?;
        let directory = self
            .directory
            .ok_or(RuntimeError::MissingCollaborator("an actor directory"))?;
        let host = self
            .host
            .ok_or(RuntimeError::MissingCollaborator("host sync"))?;
        let display = self.display.unwrap_or_else(|| Arc::new(NullDisplay));
        let rng = self.rng.unwrap_or_else(|| Arc::new(PcgRng));
        let game_seed = self.config.game_seed.unwrap_or_else(rand::random);

        let resources = Arc::new(ResourcePool::new(
            self.config.resources.clone(),
            display.clone(),
        ));
        let stats = Arc::new(StatAggregator::new(
            self.config.stats.clone(),
            self.config.join_defaults.clone(),
            repository,
            equipment,
            directory.clone(),
            host,
            display.clone(),
            resources.clone(),
        ));
        let abilities = AbilityActivationCoordinator::new(
            self.abilities,
            item_abilities,
            stats.clone(),
            resources.clone(),
            display.clone(),
        );
        let combat = CombatService::new(
            self.config.combat.clone(),
            stats.clone(),
            directory.clone(),
            display,
            rng,
            game_seed,
        );

        tracing::debug!(
            target: "runtime::stats",
            game_seed,
            abilities = abilities.registry().len(),
            "runtime built"
        );

        Ok(RpgRuntime {
            config: self.config,
            directory,
            stats,
            resources,
            abilities,
            combat,
            ai: AiRegistry::new(),
        })
    }
}

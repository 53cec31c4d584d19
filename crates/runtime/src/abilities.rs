//! Ability registry and the activation gate.
//!
//! [`AbilityActivationCoordinator::attempt_activate`] runs one attempt through
//! the fixed pipeline:
//!
//! ```text
//! item link ─► trigger match ─► cooldown ─► pay cost ─► precondition ─► execute
//!     │              │              │           │             │             │
//! NotApplicable NotApplicable  OnCooldown  Insufficient  refund +      refund on
//!                                          Resource      Precondition  error/decline
//!                                                        Failed
//! ```
//!
//! Cost is paid before the ability's own hooks run and handed back on every
//! path that does not end in success, so a failed attempt never costs mana.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

use rpg_core::{
    Ability, AbilityContext, AbilityError, AbilityId, ActivationPhase, ActivationResult, ActorId,
    CooldownEntry, EquipmentSlot, GameError, InputAction, ItemHandle, Tick,
};

use crate::oracle::{DisplaySink, ItemAbilityOracle};
use crate::resources::ResourcePool;
use crate::stats::StatAggregator;

/// Abilities known to the runtime, keyed by id.
#[derive(Default, Clone)]
pub struct AbilityRegistry {
    abilities: HashMap<AbilityId, Arc<dyn Ability>>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an ability, replacing any previous one with the same id.
    pub fn register(&mut self, ability: impl Ability + 'static) -> &mut Self {
        self.register_arc(Arc::new(ability))
    }

    pub fn register_arc(&mut self, ability: Arc<dyn Ability>) -> &mut Self {
        let id = ability.id().clone();
        if self.abilities.insert(id.clone(), ability).is_some() {
            tracing::warn!(target: "runtime::abilities", ability = %id, "ability re-registered");
        }
        self
    }

    pub fn with(mut self, ability: impl Ability + 'static) -> Self {
        self.register(ability);
        self
    }

    pub fn get(&self, id: &AbilityId) -> Option<Arc<dyn Ability>> {
        self.abilities.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

type CooldownKey = (ActorId, AbilityId);

pub struct AbilityActivationCoordinator {
    registry: AbilityRegistry,
    items: Arc<dyn ItemAbilityOracle>,
    stats: Arc<StatAggregator>,
    resources: Arc<ResourcePool>,
    display: Arc<dyn DisplaySink>,
    cooldowns: RwLock<HashMap<CooldownKey, CooldownEntry>>,
}

impl AbilityActivationCoordinator {
    pub fn new(
        registry: AbilityRegistry,
        items: Arc<dyn ItemAbilityOracle>,
        stats: Arc<StatAggregator>,
        resources: Arc<ResourcePool>,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        Self {
            registry,
            items,
            stats,
            resources,
            display,
            cooldowns: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    /// Try to fire the ability linked to `item` for `actor`.
    pub fn attempt_activate(
        &self,
        actor: ActorId,
        item: ItemHandle,
        action: InputAction,
        slot: EquipmentSlot,
        now: Tick,
    ) -> ActivationResult {
        let Some(link) = self.items.linked_ability(item) else {
            return ActivationResult::NotApplicable;
        };
        let Some(ability) = self.registry.get(&link.ability) else {
            tracing::warn!(
                target: "runtime::abilities",
                ability = %link.ability,
                %item,
                "item links an unknown ability"
            );
            return ActivationResult::NotApplicable;
        };
        if !ability.matches_trigger(action, slot) {
            return ActivationResult::NotApplicable;
        }

        let id = ability.id().clone();
        trace_phase(actor, &id, ActivationPhase::Checking);

        let remaining = self.cooldown_remaining(actor, &id, now);
        if remaining > 0 {
            return self.reject(
                actor,
                &id,
                ActivationResult::OnCooldown {
                    remaining_ticks: remaining,
                },
            );
        }

        let cost = link
            .cost_override
            .unwrap_or_else(|| ability.default_resource_cost());
        if !self.resources.consume(actor, cost) {
            return self.reject(
                actor,
                &id,
                ActivationResult::InsufficientResource {
                    required: cost,
                    available: self.resources.current(actor),
                },
            );
        }

        let snapshot = self.stats.snapshot(actor);
        let ctx = AbilityContext {
            actor,
            item,
            now,
            snapshot: &snapshot,
        };

        let precondition = guarded(&id, || Ok(ability.precondition(&ctx)));
        match precondition {
            Ok(true) => {}
            Ok(false) => {
                self.refund(actor, &id, cost);
                return self.reject(actor, &id, ActivationResult::PreconditionFailed);
            }
            Err(error) => {
                self.log_failure(actor, &error);
                self.refund(actor, &id, cost);
                return self.reject(actor, &id, ActivationResult::ExecutionError);
            }
        }

        trace_phase(actor, &id, ActivationPhase::Executing);
        match guarded(&id, || ability.execute(&ctx)) {
            Ok(true) => {
                let cooldown_ticks = ability.default_cooldown_ticks();
                if cooldown_ticks > 0 {
                    self.cooldowns_mut()
                        .insert((actor, id.clone()), CooldownEntry::new(now, cooldown_ticks));
                }
                trace_phase(actor, &id, ActivationPhase::Succeeded);
                tracing::debug!(
                    target: "runtime::abilities",
                    actor = %actor,
                    ability = %id,
                    cost,
                    cooldown_ticks,
                    "ability activated"
                );
                ActivationResult::Success {
                    cost,
                    cooldown_ticks,
                }
            }
            Ok(false) => {
                self.refund(actor, &id, cost);
                self.reject(actor, &id, ActivationResult::ExecutionDeclined)
            }
            Err(error) => {
                self.log_failure(actor, &error);
                self.refund(actor, &id, cost);
                self.reject(actor, &id, ActivationResult::ExecutionError)
            }
        }
    }

    /// Ticks until `ability` is usable again by `actor`; 0 when ready.
    pub fn cooldown_remaining(&self, actor: ActorId, ability: &AbilityId, now: Tick) -> u64 {
        self.cooldowns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(actor, ability.clone()))
            .map_or(0, |entry| entry.remaining(now))
    }

    pub fn cooldown_count(&self) -> usize {
        self.cooldowns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear every cooldown record.
    pub fn shutdown(&self) {
        self.cooldowns_mut().clear();
    }

    fn refund(&self, actor: ActorId, ability: &AbilityId, cost: u32) {
        if cost > 0 {
            self.resources.add(actor, cost);
        }
        trace_phase(actor, ability, ActivationPhase::Refunded);
    }

    fn reject(&self, actor: ActorId, ability: &AbilityId, result: ActivationResult) -> ActivationResult {
        tracing::debug!(
            target: "runtime::abilities",
            actor = %actor,
            ability = %ability,
            code = result.code(),
            "activation rejected"
        );
        self.display.activation_rejected(actor, ability, &result);
        result
    }

    fn log_failure(&self, actor: ActorId, error: &AbilityError) {
        tracing::error!(
            target: "runtime::abilities",
            actor = %actor,
            code = error.error_code(),
            severity = error.severity().as_str(),
            error = %error,
            "ability hook failed"
        );
    }

    fn cooldowns_mut(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<CooldownKey, CooldownEntry>> {
        self.cooldowns.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn trace_phase(actor: ActorId, ability: &AbilityId, phase: ActivationPhase) {
    tracing::trace!(target: "runtime::abilities", actor = %actor, ability = %ability, %phase);
}

/// Run an ability hook, turning a panic into [`AbilityError::Panicked`].
fn guarded<T>(
    ability: &AbilityId,
    hook: impl FnOnce() -> Result<T, AbilityError>,
) -> Result<T, AbilityError> {
    catch_unwind(AssertUnwindSafe(hook)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned());
        Err(AbilityError::Panicked {
            ability: ability.clone(),
            message,
        })
    })
}

#[cfg(test)]
mod tests {
    use rpg_content::{ItemCatalog, ItemEntry};
    use rpg_core::{AbilityLink, BaseProfile, ResourceConfig, StatConfig, StatKind, Trigger};

    use super::*;
    use crate::oracle::{ActorRoster, LoadoutOracle};
    use crate::repository::InMemoryProfileRepo;
    use crate::testing::{DisplayEvent, Outcome, RecordingDisplay, RecordingHost, ScriptedAbility};

    const ACTOR: ActorId = ActorId(1);
    const WAND: ItemHandle = ItemHandle(10);
    const PLAIN: ItemHandle = ItemHandle(11);

    struct Fixture {
        coordinator: AbilityActivationCoordinator,
        resources: Arc<ResourcePool>,
        display: Arc<RecordingDisplay>,
    }

    fn fixture(ability: ScriptedAbility, link: AbilityLink, mana: u32) -> Fixture {
        let catalog = ItemCatalog::new()
            .with_item(
                WAND,
                ItemEntry {
                    ability: Some(link),
                    ..ItemEntry::default()
                },
            )
            .with_item(PLAIN, ItemEntry::default());
        let loadouts = Arc::new(LoadoutOracle::new(catalog));
        let display = Arc::new(RecordingDisplay::default());
        let resources = Arc::new(ResourcePool::new(
            ResourceConfig::default(),
            display.clone(),
        ));
        let stats = Arc::new(StatAggregator::new(
            StatConfig::default(),
            BaseProfile::default().with(StatKind::MaxMana, mana as i32),
            Arc::new(InMemoryProfileRepo::new()),
            loadouts.clone(),
            Arc::new(ActorRoster::with_actors([ACTOR])),
            Arc::new(RecordingHost::default()),
            display.clone(),
            resources.clone(),
        ));
        resources.join(ACTOR, stats.snapshot(ACTOR).max_mana());

        let coordinator = AbilityActivationCoordinator::new(
            AbilityRegistry::new().with(ability),
            loadouts,
            stats,
            resources.clone(),
            display.clone(),
        );
        Fixture {
            coordinator,
            resources,
            display,
        }
    }

    fn right_click(f: &Fixture, item: ItemHandle, now: u64) -> ActivationResult {
        f.coordinator.attempt_activate(
            ACTOR,
            item,
            InputAction::RightClick,
            EquipmentSlot::MainHand,
            Tick(now),
        )
    }

    #[test]
    fn item_without_link_is_not_applicable() {
        let f = fixture(ScriptedAbility::new("bolt", 5), AbilityLink::new("bolt"), 20);
        assert_eq!(right_click(&f, PLAIN, 0), ActivationResult::NotApplicable);
        assert_eq!(f.resources.current(ACTOR), 20);
        assert!(f.display.events().iter().all(|e| !matches!(e, DisplayEvent::Rejected { .. })));
    }

    #[test]
    fn unknown_ability_is_not_applicable() {
        let f = fixture(ScriptedAbility::new("bolt", 5), AbilityLink::new("missing"), 20);
        assert_eq!(right_click(&f, WAND, 0), ActivationResult::NotApplicable);
    }

    #[test]
    fn trigger_mismatch_is_not_applicable() {
        let f = fixture(
            ScriptedAbility::new("bolt", 5).with_triggers(vec![Trigger::LEFT_CLICK]),
            AbilityLink::new("bolt"),
            20,
        );
        assert_eq!(right_click(&f, WAND, 0), ActivationResult::NotApplicable);
        assert_eq!(f.resources.current(ACTOR), 20);
    }

    #[test]
    fn success_charges_cost_and_starts_cooldown() {
        let f = fixture(
            ScriptedAbility::new("bolt", 5).with_cooldown(40),
            AbilityLink::new("bolt"),
            20,
        );
        assert_eq!(
            right_click(&f, WAND, 0),
            ActivationResult::Success {
                cost: 5,
                cooldown_ticks: 40
            }
        );
        assert_eq!(f.resources.current(ACTOR), 15);
        assert_eq!(
            f.coordinator
                .cooldown_remaining(ACTOR, &AbilityId::new("bolt"), Tick(10)),
            30
        );
    }

    #[test]
    fn item_cost_override_replaces_default() {
        let f = fixture(
            ScriptedAbility::new("bolt", 5),
            AbilityLink::new("bolt").with_cost(12),
            20,
        );
        assert_eq!(
            right_click(&f, WAND, 0),
            ActivationResult::Success {
                cost: 12,
                cooldown_ticks: 0
            }
        );
        assert_eq!(f.resources.current(ACTOR), 8);
    }

    #[test]
    fn insufficient_mana_deducts_nothing() {
        let f = fixture(ScriptedAbility::new("bolt", 25), AbilityLink::new("bolt"), 20);
        assert_eq!(
            right_click(&f, WAND, 0),
            ActivationResult::InsufficientResource {
                required: 25,
                available: 20
            }
        );
        assert_eq!(f.resources.current(ACTOR), 20);
    }

    #[test]
    fn failed_paths_refund_and_skip_cooldown() {
        let cases = [
            (
                ScriptedAbility::new("bolt", 7).with_cooldown(10).with_precondition(false),
                ActivationResult::PreconditionFailed,
            ),
            (
                ScriptedAbility::new("bolt", 7).with_cooldown(10).with_outcome(Outcome::Decline),
                ActivationResult::ExecutionDeclined,
            ),
            (
                ScriptedAbility::new("bolt", 7).with_cooldown(10).with_outcome(Outcome::Fail),
                ActivationResult::ExecutionError,
            ),
            (
                ScriptedAbility::new("bolt", 7).with_cooldown(10).with_outcome(Outcome::Panic),
                ActivationResult::ExecutionError,
            ),
        ];

        for (ability, expected) in cases {
            let f = fixture(ability, AbilityLink::new("bolt"), 20);
            assert_eq!(right_click(&f, WAND, 0), expected);
            assert_eq!(f.resources.current(ACTOR), 20, "{expected:?} must refund");
            assert_eq!(f.coordinator.cooldown_count(), 0);
        }
    }

    #[test]
    fn rejections_reach_the_display() {
        let f = fixture(ScriptedAbility::new("bolt", 50), AbilityLink::new("bolt"), 20);
        right_click(&f, WAND, 0);
        assert!(f.display.events().iter().any(|e| matches!(
            e,
            DisplayEvent::Rejected {
                result: ActivationResult::InsufficientResource { .. },
                ..
            }
        )));
    }

    #[test]
    fn shutdown_clears_cooldowns() {
        let f = fixture(
            ScriptedAbility::new("bolt", 0).with_cooldown(100),
            AbilityLink::new("bolt"),
            0,
        );
        assert!(right_click(&f, WAND, 0).is_success());
        assert!(matches!(right_click(&f, WAND, 1), ActivationResult::OnCooldown { .. }));

        f.coordinator.shutdown();
        assert!(right_click(&f, WAND, 2).is_success());
    }
}

//! The simulated game host.
//!
//! Keeps the little world state the runtime does not own (health bars and
//! queued actions) and turns runtime feedback into log lines.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rpg_core::{
    AbilityId, ActivationResult, ActorId, AttributeSnapshot, ModifierKey, ResolvedDamage,
};
use rpg_runtime::{DisplaySink, HostSync};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    pub current: f64,
    pub max: f64,
}

impl HealthBar {
    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// Something an ability or behavior asked the host to do.
///
/// Callbacks never touch the runtime directly; the host drains these after
/// each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    Strike { attacker: ActorId, raw_damage: f64 },
    Blast { caster: ActorId, raw_damage: f64 },
    Dash { actor: ActorId, distance: f64 },
}

#[derive(Debug, Default)]
pub struct SimHost {
    health: Mutex<BTreeMap<ActorId, HealthBar>>,
    movement: Mutex<BTreeMap<ActorId, (ModifierKey, f64)>>,
    intents: Mutex<VecDeque<Intent>>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn health(&self, actor: ActorId) -> Option<HealthBar> {
        self.health_bars().get(&actor).copied()
    }

    pub fn movement_modifier(&self, actor: ActorId) -> Option<f64> {
        self.movement
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&actor)
            .map(|(_, value)| *value)
    }

    /// Subtract damage; returns the health left.
    pub fn apply_damage(&self, actor: ActorId, damage: &ResolvedDamage) -> Option<f64> {
        let mut bars = self.health_bars();
        let bar = bars.get_mut(&actor)?;
        bar.current = (bar.current - damage.amount).max(0.0);
        Some(bar.current)
    }

    pub fn forget(&self, actor: ActorId) {
        self.health_bars().remove(&actor);
        self.movement
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&actor);
    }

    pub fn push_intent(&self, intent: Intent) {
        self.intents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(intent);
    }

    pub fn drain_intents(&self) -> Vec<Intent> {
        self.intents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    fn health_bars(&self) -> MutexGuard<'_, BTreeMap<ActorId, HealthBar>> {
        self.health.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostSync for SimHost {
    fn set_max_health(&self, actor: ActorId, value: i32) {
        let max = f64::from(value.max(1));
        let mut bars = self.health_bars();
        let bar = bars
            .entry(actor)
            .or_insert(HealthBar { current: max, max });
        bar.max = max;
        bar.current = bar.current.min(max);
        tracing::info!(target: "host_sim::host", actor = %actor, max_health = value, "max health set");
    }

    fn set_movement_speed_modifier(&self, actor: ActorId, key: ModifierKey, value: f64) {
        self.movement
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(actor, (key, value));
        tracing::info!(target: "host_sim::host", actor = %actor, modifier = value, "movement speed set");
    }
}

impl DisplaySink for SimHost {
    fn damage_resolved(&self, attacker: Option<ActorId>, victim: ActorId, damage: &ResolvedDamage) {
        let marker = if damage.is_crit { " (crit)" } else { "" };
        match attacker {
            Some(attacker) => tracing::info!(
                target: "host_sim::display",
                "{attacker} hits {victim} for {:.1}{marker}",
                damage.amount
            ),
            None => tracing::info!(
                target: "host_sim::display",
                "{victim} takes {:.1} damage{marker}",
                damage.amount
            ),
        }
    }

    fn resource_changed(&self, actor: ActorId, current: u32, max: u32) {
        tracing::info!(target: "host_sim::display", "{actor} mana {current}/{max}");
    }

    fn stats_changed(&self, actor: ActorId, snapshot: &AttributeSnapshot) {
        tracing::debug!(target: "host_sim::display", actor = %actor, ?snapshot, "stats changed");
    }

    fn activation_rejected(&self, actor: ActorId, ability: &AbilityId, result: &ActivationResult) {
        tracing::info!(
            target: "host_sim::display",
            "{actor} cannot use {ability}: {}",
            result.code()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_health_clamps_current() {
        let host = SimHost::new();
        host.set_max_health(ActorId(1), 50);
        host.set_max_health(ActorId(1), 30);
        assert_eq!(
            host.health(ActorId(1)),
            Some(HealthBar {
                current: 30.0,
                max: 30.0
            })
        );

        host.set_max_health(ActorId(1), 40);
        assert_eq!(host.health(ActorId(1)).unwrap().current, 30.0);
    }

    #[test]
    fn intents_drain_in_order() {
        let host = SimHost::new();
        host.push_intent(Intent::Dash {
            actor: ActorId(1),
            distance: 3.0,
        });
        host.push_intent(Intent::Strike {
            attacker: ActorId(2),
            raw_damage: 4.0,
        });
        let drained = host.drain_intents();
        assert_eq!(drained.len(), 2);
        assert!(matches!(drained[0], Intent::Dash { .. }));
        assert!(host.drain_intents().is_empty());
    }
}

//! Sample abilities bundled with the simulated host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rpg_core::{
    Ability, AbilityContext, AbilityError, AbilityId, ActorId, CooldownEntry, Trigger,
    scaled_cooldown_ticks,
};
use rpg_runtime::AbilityRegistry;

use crate::host::{Intent, SimHost};

/// Short dash forward. Its cooldown shrinks with the caster's speed, so it
/// keeps its own cooldown table instead of using the coordinator's.
pub struct Leap {
    id: AbilityId,
    host: Arc<SimHost>,
    cooldowns: Mutex<HashMap<ActorId, CooldownEntry>>,
}

impl Leap {
    pub const BASE_COOLDOWN_TICKS: u64 = 60;
    const TRIGGERS: [Trigger; 1] = [Trigger::RIGHT_CLICK];

    pub fn new(host: Arc<SimHost>) -> Self {
        Self {
            id: AbilityId::new("leap"),
            host,
            cooldowns: Mutex::new(HashMap::new()),
        }
    }
}

impl Ability for Leap {
    fn id(&self) -> &AbilityId {
        &self.id
    }

    fn triggers(&self) -> &[Trigger] {
        &Self::TRIGGERS
    }

    fn default_resource_cost(&self) -> u32 {
        10
    }

    fn precondition(&self, ctx: &AbilityContext<'_>) -> bool {
        self.cooldowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ctx.actor)
            .is_none_or(|entry| entry.is_ready(ctx.now))
    }

    fn execute(&self, ctx: &AbilityContext<'_>) -> Result<bool, AbilityError> {
        let speed = ctx.snapshot.speed_percent();
        let cooldown = scaled_cooldown_ticks(Self::BASE_COOLDOWN_TICKS, speed);
        self.cooldowns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ctx.actor, CooldownEntry::new(ctx.now, cooldown));

        self.host.push_intent(Intent::Dash {
            actor: ctx.actor,
            distance: 2.0 + f64::from(speed.max(0)) / 50.0,
        });
        tracing::debug!(target: "host_sim::abilities", actor = %ctx.actor, cooldown, "leap");
        Ok(true)
    }
}

/// Ranged blast at the caster's current target.
pub struct Fireball {
    id: AbilityId,
    host: Arc<SimHost>,
}

impl Fireball {
    pub const RAW_DAMAGE: f64 = 12.0;
    const TRIGGERS: [Trigger; 1] = [Trigger::RIGHT_CLICK];

    pub fn new(host: Arc<SimHost>) -> Self {
        Self {
            id: AbilityId::new("fireball"),
            host,
        }
    }
}

impl Ability for Fireball {
    fn id(&self) -> &AbilityId {
        &self.id
    }

    fn triggers(&self) -> &[Trigger] {
        &Self::TRIGGERS
    }

    fn default_resource_cost(&self) -> u32 {
        20
    }

    fn default_cooldown_ticks(&self) -> u64 {
        40
    }

    fn execute(&self, ctx: &AbilityContext<'_>) -> Result<bool, AbilityError> {
        if self.host.health(ctx.actor).is_none_or(|bar| bar.is_dead()) {
            return Err(AbilityError::execution(&self.id, "caster has no body"));
        }
        self.host.push_intent(Intent::Blast {
            caster: ctx.actor,
            raw_damage: Self::RAW_DAMAGE,
        });
        Ok(true)
    }
}

pub fn registry(host: &Arc<SimHost>) -> AbilityRegistry {
    AbilityRegistry::new()
        .with(Leap::new(host.clone()))
        .with(Fireball::new(host.clone()))
}

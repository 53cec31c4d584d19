//! Recording fakes for the collaborator traits.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! downstream crates that drive the runtime without a real host.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use rpg_core::{
    Ability, AbilityContext, AbilityError, AbilityId, ActivationResult, ActorId,
    AttributeSnapshot, BaseProfile, ModifierKey, ResolvedDamage, Trigger,
};

use crate::oracle::{DisplaySink, HostSync};
use crate::repository::{self, ProfileRepository, RepositoryError};

/// One call received by [`RecordingHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    MaxHealth {
        actor: ActorId,
        value: i32,
    },
    MovementSpeed {
        actor: ActorId,
        key: ModifierKey,
        value: f64,
    },
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn max_health_calls(&self, actor: ActorId) -> Vec<i32> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::MaxHealth { actor: a, value } if a == actor => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl HostSync for RecordingHost {
    fn set_max_health(&self, actor: ActorId, value: i32) {
        self.push(HostCall::MaxHealth { actor, value });
    }

    fn set_movement_speed_modifier(&self, actor: ActorId, key: ModifierKey, value: f64) {
        self.push(HostCall::MovementSpeed { actor, key, value });
    }
}

/// One notification received by [`RecordingDisplay`].
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayEvent {
    Damage {
        attacker: Option<ActorId>,
        victim: ActorId,
        damage: ResolvedDamage,
    },
    Resource {
        actor: ActorId,
        current: u32,
        max: u32,
    },
    Stats {
        actor: ActorId,
        snapshot: AttributeSnapshot,
    },
    Rejected {
        actor: ActorId,
        ability: AbilityId,
        result: ActivationResult,
    },
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl RecordingDisplay {
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stats_events(&self, actor: ActorId) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, DisplayEvent::Stats { actor: a, .. } if *a == actor))
            .count()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, event: DisplayEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl DisplaySink for RecordingDisplay {
    fn damage_resolved(&self, attacker: Option<ActorId>, victim: ActorId, damage: &ResolvedDamage) {
        self.push(DisplayEvent::Damage {
            attacker,
            victim,
            damage: *damage,
        });
    }

    fn resource_changed(&self, actor: ActorId, current: u32, max: u32) {
        self.push(DisplayEvent::Resource {
            actor,
            current,
            max,
        });
    }

    fn stats_changed(&self, actor: ActorId, snapshot: &AttributeSnapshot) {
        self.push(DisplayEvent::Stats {
            actor,
            snapshot: *snapshot,
        });
    }

    fn activation_rejected(&self, actor: ActorId, ability: &AbilityId, result: &ActivationResult) {
        self.push(DisplayEvent::Rejected {
            actor,
            ability: ability.clone(),
            result: result.clone(),
        });
    }
}

/// Repository whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingProfileRepo;

impl ProfileRepository for FailingProfileRepo {
    fn load(&self, _actor: ActorId) -> repository::Result<Option<BaseProfile>> {
        Err(RepositoryError::CorruptedData("unreadable".into()))
    }

    fn save(&self, _actor: ActorId, _profile: &BaseProfile) -> repository::Result<()> {
        Err(RepositoryError::LockPoisoned)
    }

    fn delete(&self, _actor: ActorId) -> repository::Result<()> {
        Err(RepositoryError::LockPoisoned)
    }
}

/// What [`ScriptedAbility::execute`] does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Decline,
    Fail,
    Panic,
}

/// Ability with fixed answers, counting how often each hook ran.
pub struct ScriptedAbility {
    id: AbilityId,
    triggers: Vec<Trigger>,
    cost: u32,
    cooldown_ticks: u64,
    precondition: bool,
    outcome: Outcome,
    executions: AtomicU32,
}

impl ScriptedAbility {
    /// Right-click ability that always succeeds.
    pub fn new(id: &str, cost: u32) -> Self {
        Self {
            id: AbilityId::new(id),
            triggers: vec![Trigger::RIGHT_CLICK],
            cost,
            cooldown_ticks: 0,
            precondition: true,
            outcome: Outcome::Succeed,
            executions: AtomicU32::new(0),
        }
    }

    pub fn with_cooldown(mut self, ticks: u64) -> Self {
        self.cooldown_ticks = ticks;
        self
    }

    pub fn with_precondition(mut self, passes: bool) -> Self {
        self.precondition = passes;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn with_triggers(mut self, triggers: Vec<Trigger>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn executions(&self) -> u32 {
        self.executions.load(Ordering::SeqCst)
    }
}

impl Ability for ScriptedAbility {
    fn id(&self) -> &AbilityId {
        &self.id
    }

    fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    fn default_resource_cost(&self) -> u32 {
        self.cost
    }

    fn default_cooldown_ticks(&self) -> u64 {
        self.cooldown_ticks
    }

    fn precondition(&self, _ctx: &AbilityContext<'_>) -> bool {
        self.precondition
    }

    fn execute(&self, _ctx: &AbilityContext<'_>) -> Result<bool, AbilityError> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Succeed => Ok(true),
            Outcome::Decline => Ok(false),
            Outcome::Fail => Err(AbilityError::execution(&self.id, "scripted failure")),
            Outcome::Panic => panic!("scripted panic in {}", self.id),
        }
    }
}

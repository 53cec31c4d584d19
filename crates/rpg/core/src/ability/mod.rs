//! Ability contract and activation outcomes.
//!
//! Concrete abilities live outside the core. The activation coordinator only
//! knows the [`Ability`] trait: trigger matching, default cost and cooldown,
//! and the precondition/execute hooks.

pub mod cooldown;

pub use cooldown::{CooldownEntry, scaled_cooldown_ticks};

use crate::error::AbilityError;
use crate::stats::AttributeSnapshot;
use crate::types::{AbilityId, ActorId, EquipmentSlot, InputAction, ItemHandle, Tick};

/// One (action, slot) combination that fires an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    pub action: InputAction,
    pub slot: EquipmentSlot,
}

impl Trigger {
    pub const fn new(action: InputAction, slot: EquipmentSlot) -> Self {
        Self { action, slot }
    }

    /// Right click with the item in the main hand.
    pub const RIGHT_CLICK: Self = Self::new(InputAction::RightClick, EquipmentSlot::MainHand);

    /// Left click with the item in the main hand.
    pub const LEFT_CLICK: Self = Self::new(InputAction::LeftClick, EquipmentSlot::MainHand);
}

/// Ability linked from an item's metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityLink {
    pub ability: AbilityId,
    /// Item-specific resource cost replacing the ability default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost_override: Option<u32>,
}

impl AbilityLink {
    pub fn new(ability: impl Into<AbilityId>) -> Self {
        Self {
            ability: ability.into(),
            cost_override: None,
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost_override = Some(cost);
        self
    }
}

/// Read-only view handed to ability hooks.
#[derive(Clone, Copy, Debug)]
pub struct AbilityContext<'a> {
    pub actor: ActorId,
    pub item: ItemHandle,
    pub now: Tick,
    /// Caster's current stats, for abilities that scale (dynamic cooldowns,
    /// damage multipliers).
    pub snapshot: &'a AttributeSnapshot,
}

/// Contract every ability exposes to the activation coordinator.
pub trait Ability: Send + Sync {
    fn id(&self) -> &AbilityId;

    /// (action, slot) combinations that fire this ability.
    fn triggers(&self) -> &[Trigger];

    fn matches_trigger(&self, action: InputAction, slot: EquipmentSlot) -> bool {
        self.triggers()
            .iter()
            .any(|t| t.action == action && t.slot == slot)
    }

    /// Mana charged when the item does not override it.
    fn default_resource_cost(&self) -> u32;

    /// Fixed cooldown managed by the coordinator. 0 = none (or dynamic).
    fn default_cooldown_ticks(&self) -> u64 {
        0
    }

    /// Checked after the cost was deducted. `false` refunds the cost.
    fn precondition(&self, _ctx: &AbilityContext<'_>) -> bool {
        true
    }

    /// Perform the ability.
    ///
    /// `Ok(true)` commits cost and cooldown; `Ok(false)` declines and refunds;
    /// `Err` is logged and refunded.
    fn execute(&self, ctx: &AbilityContext<'_>) -> Result<bool, AbilityError>;
}

/// Lifecycle of one activation attempt, reported in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActivationPhase {
    Checking,
    Executing,
    Succeeded,
    Refunded,
}

/// Outcome of an activation attempt.
///
/// Every rejection is distinguishable so the caller can show the right
/// feedback (cooldown timer, "not enough mana", ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivationResult {
    /// No ability linked, or the action/slot does not trigger it.
    NotApplicable,
    OnCooldown { remaining_ticks: u64 },
    InsufficientResource { required: u32, available: u32 },
    /// Precondition rejected; cost refunded.
    PreconditionFailed,
    /// Ability raised an error or panicked; cost refunded.
    ExecutionError,
    /// Ability returned `false`; cost refunded, no cooldown.
    ExecutionDeclined,
    Success { cost: u32, cooldown_ticks: u64 },
}

impl ActivationResult {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::OnCooldown { .. } => "ON_COOLDOWN",
            Self::InsufficientResource { .. } => "INSUFFICIENT_RESOURCE",
            Self::PreconditionFailed => "PRECONDITION_FAILED",
            Self::ExecutionError => "EXECUTION_ERROR",
            Self::ExecutionDeclined => "EXECUTION_DECLINED",
            Self::Success { .. } => "SUCCESS",
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Rejections the player should be told about.
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::NotApplicable | Self::Success { .. })
    }

    /// Outcomes that charged and then returned the cost.
    pub const fn is_refunded(&self) -> bool {
        matches!(
            self,
            Self::PreconditionFailed | Self::ExecutionError | Self::ExecutionDeclined
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAP_TRIGGERS: [Trigger; 2] = [
        Trigger::RIGHT_CLICK,
        Trigger::new(InputAction::SneakRightClick, EquipmentSlot::MainHand),
    ];

    struct Leap {
        id: AbilityId,
    }

    impl Ability for Leap {
        fn id(&self) -> &AbilityId {
            &self.id
        }

        fn triggers(&self) -> &[Trigger] {
            &LEAP_TRIGGERS
        }

        fn default_resource_cost(&self) -> u32 {
            30
        }

        fn execute(&self, _ctx: &AbilityContext<'_>) -> Result<bool, AbilityError> {
            Ok(true)
        }
    }

    #[test]
    fn trigger_matching_requires_action_and_slot() {
        let leap = Leap { id: "leap".into() };
        assert!(leap.matches_trigger(InputAction::RightClick, EquipmentSlot::MainHand));
        assert!(leap.matches_trigger(InputAction::SneakRightClick, EquipmentSlot::MainHand));
        assert!(!leap.matches_trigger(InputAction::RightClick, EquipmentSlot::OffHand));
        assert!(!leap.matches_trigger(InputAction::LeftClick, EquipmentSlot::MainHand));
    }

    #[test]
    fn result_codes_are_distinct() {
        let results = [
            ActivationResult::NotApplicable,
            ActivationResult::OnCooldown { remaining_ticks: 1 },
            ActivationResult::InsufficientResource {
                required: 1,
                available: 0,
            },
            ActivationResult::PreconditionFailed,
            ActivationResult::ExecutionError,
            ActivationResult::ExecutionDeclined,
            ActivationResult::Success {
                cost: 1,
                cooldown_ticks: 0,
            },
        ];
        let mut codes: Vec<_> = results.iter().map(ActivationResult::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), results.len());
        assert!(results.iter().filter(|r| r.is_refunded()).count() == 3);
    }
}

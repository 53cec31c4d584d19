//! BaseProfile - the persisted, gear-independent stat record of an actor.

use super::kind::StatKind;

/// Base (unequipped) stat values.
///
/// Stored as plain named integers so persistence back-ends can write them as-is.
/// Every field defaults to zero except `max_health`, which defaults to 1.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseProfile {
    pub strength: i32,
    pub defense: i32,
    pub crit_chance: i32,
    pub crit_damage: i32,
    pub max_health: i32,
    pub max_mana: i32,
    pub speed: i32,
    pub mining_speed: i32,
    pub foraging_speed: i32,
    pub fishing_speed: i32,
    pub shooting_speed: i32,
}

impl Default for BaseProfile {
    fn default() -> Self {
        Self {
            strength: 0,
            defense: 0,
            crit_chance: 0,
            crit_damage: 0,
            max_health: 1,
            max_mana: 0,
            speed: 0,
            mining_speed: 0,
            foraging_speed: 0,
            fishing_speed: 0,
            shooting_speed: 0,
        }
    }
}

impl BaseProfile {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Defense => self.defense,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritDamage => self.crit_damage,
            StatKind::MaxHealth => self.max_health,
            StatKind::MaxMana => self.max_mana,
            StatKind::Speed => self.speed,
            StatKind::MiningSpeed => self.mining_speed,
            StatKind::ForagingSpeed => self.foraging_speed,
            StatKind::FishingSpeed => self.fishing_speed,
            StatKind::ShootingSpeed => self.shooting_speed,
        }
    }

    fn slot_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Strength => &mut self.strength,
            StatKind::Defense => &mut self.defense,
            StatKind::CritChance => &mut self.crit_chance,
            StatKind::CritDamage => &mut self.crit_damage,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::MaxMana => &mut self.max_mana,
            StatKind::Speed => &mut self.speed,
            StatKind::MiningSpeed => &mut self.mining_speed,
            StatKind::ForagingSpeed => &mut self.foraging_speed,
            StatKind::FishingSpeed => &mut self.fishing_speed,
            StatKind::ShootingSpeed => &mut self.shooting_speed,
        }
    }

    /// Overwrite one stat, or add to it when `additive` is set.
    ///
    /// Returns the stored value. Base values are not clamped here; clamping is
    /// a snapshot concern, so an admin can park a stat below its floor and
    /// raise it again later without losing the offset.
    pub fn apply(&mut self, kind: StatKind, value: i32, additive: bool) -> i32 {
        let slot = self.slot_mut(kind);
        *slot = if additive {
            slot.saturating_add(value)
        } else {
            value
        };
        *slot
    }

    /// Builder form of a non-additive [`apply`](Self::apply).
    pub fn with(mut self, kind: StatKind, value: i32) -> Self {
        self.apply(kind, value, false);
        self
    }
}

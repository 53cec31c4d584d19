//! AttributeSnapshot - the fully resolved stats of one actor at one moment.
//!
//! The snapshot captures base profile plus equipment contribution, clamped,
//! so combat and ability code never see a half-updated stat set. It is
//! immutable: a stat change produces a new snapshot.

use super::bonus::StatBonuses;
use super::kind::StatKind;
use super::profile::BaseProfile;

/// Immutable, clamped stat values.
///
/// Fields are private so the only way to obtain one is through a constructor
/// that enforces the [`StatKind::bounds`] invariants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeSnapshot {
    strength: i32,
    defense: i32,
    crit_chance: i32,
    crit_damage: i32,
    max_health: i32,
    max_mana: i32,
    speed_percent: i32,
    mining_speed: i32,
    foraging_speed: i32,
    fishing_speed: i32,
    shooting_speed: i32,
}

impl Default for AttributeSnapshot {
    /// Snapshot handed out for actors with no tracked profile:
    /// all zero, `max_health` = 1.
    fn default() -> Self {
        Self::compose(&BaseProfile::default(), &StatBonuses::new())
    }
}

impl AttributeSnapshot {
    /// Build a snapshot from base values plus equipment bonuses.
    ///
    /// Each stat is `clamp(base + bonus)` using the stat's bounds.
    pub fn compose(base: &BaseProfile, bonuses: &StatBonuses) -> Self {
        let resolve = |kind: StatKind| -> i32 {
            let raw = i64::from(base.get(kind)).saturating_add(bonuses.get(kind));
            kind.bounds().clamp(raw)
        };

        Self {
            strength: resolve(StatKind::Strength),
            defense: resolve(StatKind::Defense),
            crit_chance: resolve(StatKind::CritChance),
            crit_damage: resolve(StatKind::CritDamage),
            max_health: resolve(StatKind::MaxHealth),
            max_mana: resolve(StatKind::MaxMana),
            speed_percent: resolve(StatKind::Speed),
            mining_speed: resolve(StatKind::MiningSpeed),
            foraging_speed: resolve(StatKind::ForagingSpeed),
            fishing_speed: resolve(StatKind::FishingSpeed),
            shooting_speed: resolve(StatKind::ShootingSpeed),
        }
    }

    /// Snapshot with no equipment contribution.
    pub fn from_base(base: &BaseProfile) -> Self {
        Self::compose(base, &StatBonuses::new())
    }

    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Strength => self.strength,
            StatKind::Defense => self.defense,
            StatKind::CritChance => self.crit_chance,
            StatKind::CritDamage => self.crit_damage,
            StatKind::MaxHealth => self.max_health,
            StatKind::MaxMana => self.max_mana,
            StatKind::Speed => self.speed_percent,
            StatKind::MiningSpeed => self.mining_speed,
            StatKind::ForagingSpeed => self.foraging_speed,
            StatKind::FishingSpeed => self.fishing_speed,
            StatKind::ShootingSpeed => self.shooting_speed,
        }
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    /// Crit chance in percent, always within [0, 100].
    pub fn crit_chance(&self) -> i32 {
        self.crit_chance
    }

    /// Crit damage bonus in percent, always ≥ 0.
    pub fn crit_damage(&self) -> i32 {
        self.crit_damage
    }

    /// Always ≥ 1.
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Always ≥ 0; the mana pool is clamped to this value.
    pub fn max_mana(&self) -> u32 {
        self.max_mana as u32
    }

    pub fn speed_percent(&self) -> i32 {
        self.speed_percent
    }

    pub fn mining_speed(&self) -> i32 {
        self.mining_speed
    }

    pub fn foraging_speed(&self) -> i32 {
        self.foraging_speed
    }

    pub fn fishing_speed(&self) -> i32 {
        self.fishing_speed
    }

    pub fn shooting_speed(&self) -> i32 {
        self.shooting_speed
    }

    /// Movement-speed modifier pushed to the host (1.0 = +100%).
    pub fn movement_speed_modifier(&self) -> f64 {
        f64::from(self.speed_percent) / 100.0
    }
}

/// Fluent construction of snapshots from literal values.
///
/// Values go through the same clamping as [`AttributeSnapshot::compose`].
#[derive(Clone, Debug, Default)]
pub struct SnapshotBuilder {
    profile: BaseProfile,
}

impl SnapshotBuilder {
    pub fn stat(mut self, kind: StatKind, value: i32) -> Self {
        self.profile.apply(kind, value, false);
        self
    }

    pub fn strength(self, value: i32) -> Self {
        self.stat(StatKind::Strength, value)
    }

    pub fn defense(self, value: i32) -> Self {
        self.stat(StatKind::Defense, value)
    }

    pub fn crit_chance(self, value: i32) -> Self {
        self.stat(StatKind::CritChance, value)
    }

    pub fn crit_damage(self, value: i32) -> Self {
        self.stat(StatKind::CritDamage, value)
    }

    pub fn max_health(self, value: i32) -> Self {
        self.stat(StatKind::MaxHealth, value)
    }

    pub fn max_mana(self, value: i32) -> Self {
        self.stat(StatKind::MaxMana, value)
    }

    pub fn build(self) -> AttributeSnapshot {
        AttributeSnapshot::from_base(&self.profile)
    }
}

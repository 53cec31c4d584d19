//! Damage inputs, flags, and defense mitigation.

use bitflags::bitflags;

bitflags! {
    /// Properties of the weapon or projectile that produced a hit.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WeaponFlags: u8 {
        /// Bypass defense mitigation entirely.
        const TRUE_DAMAGE = 1 << 0;
        /// Hit came from a projectile; `multiplier` carries its power.
        const PROJECTILE = 1 << 1;
        /// Hit was produced by an ability rather than a plain swing.
        const ABILITY = 1 << 2;
    }
}

/// Environmental source of damage with no attacker.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageCause {
    Fall,
    Fire,
    FireTick,
    Lava,
    Drowning,
    Suffocation,
    Void,
    Lightning,
    Explosion,
    Poison,
    Wither,
    Magic,
    Starvation,
    Contact,
    Freeze,
    Other,
}

/// One direct (attacker → victim) hit as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectHit {
    /// Host-computed damage, already including host-native bonuses.
    pub raw_damage: f64,
    pub flags: WeaponFlags,
    /// Projectile power or ability scaling. 1.0 = unchanged.
    pub multiplier: f64,
}

impl DirectHit {
    pub fn melee(raw_damage: f64) -> Self {
        Self {
            raw_damage,
            flags: WeaponFlags::empty(),
            multiplier: 1.0,
        }
    }

    pub fn projectile(raw_damage: f64, power: f64) -> Self {
        Self {
            raw_damage,
            flags: WeaponFlags::PROJECTILE,
            multiplier: power,
        }
    }

    pub fn with_flags(mut self, flags: WeaponFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn is_true_damage(&self) -> bool {
        self.flags.contains(WeaponFlags::TRUE_DAMAGE)
    }
}

/// Lowest defense honoured by the mitigation divisor.
///
/// Keeps `100 + defense` positive, capping negative-defense amplification at ×100.
pub const MIN_EFFECTIVE_DEFENSE: i32 = -99;

/// Apply defense mitigation: `damage × 100 / (100 + defense)`.
pub fn mitigate(damage: f64, defense: i32) -> f64 {
    let defense = f64::from(defense.max(MIN_EFFECTIVE_DEFENSE));
    damage * 100.0 / (100.0 + defense)
}

/// Replace NaN/infinite host values with a neutral fallback.
pub(crate) fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Clamp a resolved amount into `[0, f64::MAX]`.
///
/// Overflow saturates at `f64::MAX`; NaN resolves to 0.
pub(crate) fn saturate_damage(damage: f64) -> f64 {
    if damage.is_nan() { 0.0 } else { damage.clamp(0.0, f64::MAX) }
}

//! Stat identifiers and their clamping bounds.

use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Every numeric stat tracked per actor.
///
/// Names parse case-insensitively from their snake_case form (`crit_chance`),
/// which is how item metadata, admin commands and profile files refer to them.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumString,
    EnumIter,
    EnumCount,
    IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKind {
    /// Flat damage added to every direct hit.
    Strength,
    /// Mitigation: incoming damage × 100 / (100 + defense).
    Defense,
    /// Percent chance (0–100) that a direct hit crits.
    CritChance,
    /// Percent bonus applied on crit.
    CritDamage,
    MaxHealth,
    MaxMana,
    /// Signed walk-speed modifier in percent.
    #[strum(to_string = "speed", serialize = "speed_percent")]
    Speed,
    MiningSpeed,
    ForagingSpeed,
    FishingSpeed,
    ShootingSpeed,
}

impl StatKind {
    /// Dense index for array-backed stat tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Clamping range enforced when a snapshot is built.
    pub const fn bounds(self) -> StatBounds {
        match self {
            Self::CritChance => StatBounds::PERCENT,
            Self::CritDamage | Self::MaxMana => StatBounds::NON_NEGATIVE,
            Self::MaxHealth => StatBounds::MAX_HEALTH,
            Self::Strength
            | Self::Defense
            | Self::Speed
            | Self::MiningSpeed
            | Self::ForagingSpeed
            | Self::FishingSpeed
            | Self::ShootingSpeed => StatBounds::UNCLAMPED,
        }
    }
}

/// Bounds configuration for a stat.
///
/// Centralizes all clamping ranges so the snapshot constructor is the only
/// place invariants are enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    /// Percentage chance [0, 100].
    pub const PERCENT: Self = Self { min: 0, max: 100 };

    /// Any value ≥ 0.
    pub const NON_NEGATIVE: Self = Self {
        min: 0,
        max: i32::MAX,
    };

    /// Health can never reach zero on a living actor.
    pub const MAX_HEALTH: Self = Self {
        min: 1,
        max: i32::MAX,
    };

    pub const UNCLAMPED: Self = Self {
        min: i32::MIN,
        max: i32::MAX,
    };

    pub const fn clamp(self, value: i64) -> i32 {
        if value < self.min as i64 {
            self.min
        } else if value > self.max as i64 {
            self.max
        } else {
            value as i32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip_through_parse() {
        for kind in StatKind::iter() {
            assert_eq!(kind.name().parse::<StatKind>(), Ok(kind));
        }
        assert_eq!("Speed_Percent".parse::<StatKind>(), Ok(StatKind::Speed));
    }

    #[test]
    fn indices_are_dense() {
        let indices: Vec<usize> = StatKind::iter().map(StatKind::index).collect();
        assert_eq!(indices, (0..StatKind::COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn bounds_clamp_wide_values() {
        assert_eq!(StatBounds::PERCENT.clamp(250), 100);
        assert_eq!(StatBounds::PERCENT.clamp(-3), 0);
        assert_eq!(StatBounds::MAX_HEALTH.clamp(0), 1);
        assert_eq!(StatBounds::UNCLAMPED.clamp(i64::MAX), i32::MAX);
    }
}

//! Tunable parameters for the stat, combat, resource and AI services.

use crate::combat::DamageCause;
use crate::stats::BaseProfile;

/// Top-level configuration, one section per service.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RpgConfig {
    pub stats: StatConfig,
    pub combat: CombatConfig,
    pub resources: ResourceConfig,
    pub ai: AiConfig,
    /// Base profile assigned to actors that join without a stored one.
    pub join_defaults: BaseProfile,
    /// Session seed for crit rolls. Random when absent.
    pub game_seed: Option<u64>,
}

/// Stat aggregation: debounce and cache sizing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatConfig {
    /// Delay between the last recompute request and the recompute itself.
    pub recompute_delay_ticks: u64,
    /// Hard upper bound on cached snapshots.
    pub cache_capacity: usize,
    /// How often stale cache entries are swept.
    pub sweep_interval_ticks: u64,
}

impl StatConfig {
    pub const DEFAULT_RECOMPUTE_DELAY_TICKS: u64 = 2;
    pub const DEFAULT_CACHE_CAPACITY: usize = 512;
    pub const DEFAULT_SWEEP_INTERVAL_TICKS: u64 = 600;
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            recompute_delay_ticks: Self::DEFAULT_RECOMPUTE_DELAY_TICKS,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
            sweep_interval_ticks: Self::DEFAULT_SWEEP_INTERVAL_TICKS,
        }
    }
}

/// Combat formula switches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Environmental causes that defense mitigates. Empty by default.
    pub mitigated_causes: Vec<DamageCause>,
}

impl CombatConfig {
    pub fn mitigates(&self, cause: DamageCause) -> bool {
        self.mitigated_causes.contains(&cause)
    }
}

/// Mana regeneration and display.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResourceConfig {
    /// Fraction of max regenerated per cycle (0.02 = 2%).
    pub regen_percent: f64,
    /// Flat amount regenerated per cycle.
    pub regen_flat: u32,
    pub regen_interval_ticks: u64,
    /// Delay before a changed value is pushed to the display.
    pub display_delay_ticks: u64,
}

impl ResourceConfig {
    pub const DEFAULT_REGEN_PERCENT: f64 = 0.02;
    pub const DEFAULT_REGEN_INTERVAL_TICKS: u64 = 20;
    pub const DEFAULT_DISPLAY_DELAY_TICKS: u64 = 1;

    /// Amount restored by one regeneration cycle for a pool of size `max`.
    pub fn regen_amount(&self, max: u32) -> u32 {
        let percent = if self.regen_percent.is_finite() {
            self.regen_percent.max(0.0)
        } else {
            0.0
        };
        let scaled = (f64::from(max) * percent).floor() as u32;
        scaled.saturating_add(self.regen_flat)
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            regen_percent: Self::DEFAULT_REGEN_PERCENT,
            regen_flat: 0,
            regen_interval_ticks: Self::DEFAULT_REGEN_INTERVAL_TICKS,
            display_delay_ticks: Self::DEFAULT_DISPLAY_DELAY_TICKS,
        }
    }
}

/// Non-player behavior scheduling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiConfig {
    pub enabled: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regen_amount_floors_percent_and_adds_flat() {
        let config = ResourceConfig {
            regen_percent: 0.02,
            regen_flat: 3,
            ..ResourceConfig::default()
        };
        assert_eq!(config.regen_amount(100), 5);
        assert_eq!(config.regen_amount(149), 5);
        assert_eq!(config.regen_amount(0), 3);
    }

    #[test]
    fn broken_regen_percent_regenerates_flat_only() {
        let config = ResourceConfig {
            regen_percent: f64::NAN,
            regen_flat: 1,
            ..ResourceConfig::default()
        };
        assert_eq!(config.regen_amount(1_000), 1);
    }

    #[test]
    fn no_environmental_cause_is_mitigated_by_default() {
        let config = CombatConfig::default();
        assert!(!config.mitigates(DamageCause::Fall));
    }
}
